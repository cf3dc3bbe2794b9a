//! Solver registry for managing and creating solver instances

use crate::error::{ParseError, RegistrationError, SolverError};
use crate::instance::{DynSolver, SolverInstance};

// ============================================================================
// Storage Constants and Index Calculation
// ============================================================================

/// Base year for AoC (first year of Advent of Code)
pub const BASE_YEAR: u16 = 2015;
/// Maximum number of years supported (2015-2034)
pub const MAX_YEARS: usize = 20;
/// Days per year in AoC (1-25)
pub const DAYS_PER_YEAR: usize = 25;
/// Total capacity of the flat storage
pub const CAPACITY: usize = MAX_YEARS * DAYS_PER_YEAR;

/// Calculate flat index from year/day, returning None if out of bounds
#[inline]
fn calc_index(year: u16, day: u8) -> Option<usize> {
    if year < BASE_YEAR || year >= BASE_YEAR + MAX_YEARS as u16 {
        return None;
    }
    if day == 0 || day > DAYS_PER_YEAR as u8 {
        return None;
    }
    let y = (year - BASE_YEAR) as usize;
    let d = (day - 1) as usize;
    Some(y * DAYS_PER_YEAR + d)
}

/// Reconstruct year/day from flat index
#[inline]
fn from_index(index: usize) -> (u16, u8) {
    let year = BASE_YEAR + (index / DAYS_PER_YEAR) as u16;
    let day = (index % DAYS_PER_YEAR) as u8 + 1;
    (year, day)
}

// ============================================================================
// Factory Types
// ============================================================================

/// Thread-safe factory function type for creating solver instances
pub type SolverFactory =
    Box<dyn for<'a> Fn(&'a str) -> Result<Box<dyn DynSolver + 'a>, ParseError> + Send + Sync>;

/// Metadata about a registered solver factory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactoryInfo {
    /// The Advent of Code year
    pub year: u16,
    /// The day number (1-25)
    pub day: u8,
    /// Number of parts this solver supports
    pub parts: u8,
}

struct SolverFactoryEntry {
    factory: SolverFactory,
    parts: u8,
}

// ============================================================================
// Plugins
// ============================================================================

/// Trait for solvers that can register themselves with a registry builder
///
/// Unlike [`Solver`](crate::Solver), this trait has no associated types, so
/// different solver types can sit behind one `&'static dyn` in a
/// [`SolverPlugin`].
///
/// Any type implementing `Solver + Sync + 'static` gets this through a
/// blanket impl.
pub trait RegisterableSolver: Sync {
    /// Register this solver type with the builder for a specific year and day
    fn register_with(
        &self,
        builder: SolverRegistryBuilder,
        year: u16,
        day: u8,
    ) -> Result<SolverRegistryBuilder, RegistrationError>;

    /// Number of parts this solver supports
    fn parts(&self) -> u8;
}

impl<S> RegisterableSolver for S
where
    S: crate::solver::Solver + Sync + 'static,
{
    fn register_with(
        &self,
        builder: SolverRegistryBuilder,
        year: u16,
        day: u8,
    ) -> Result<SolverRegistryBuilder, RegistrationError> {
        builder.register_factory(year, day, S::PARTS, move |input: &str| {
            let instance = SolverInstance::<S>::new(year, day, input)?;
            Ok(Box::new(instance))
        })
    }

    fn parts(&self) -> u8 {
        S::PARTS
    }
}

/// Plugin information for automatic solver registration
///
/// Usually submitted by `#[derive(AutoRegisterSolver)]`, but can be submitted
/// by hand:
///
/// ```no_run
/// use aoc_solver::{AocParser, ParseError, SolveError, Solver, SolverPlugin};
///
/// struct Day1Solver;
///
/// impl AocParser for Day1Solver {
///     type SharedData<'a> = ();
///
///     fn parse(_: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         Ok(())
///     }
/// }
///
/// impl Solver for Day1Solver {
///     const PARTS: u8 = 1;
///
///     fn solve_part(_: &mut Self::SharedData<'_>, part: u8) -> Result<String, SolveError> {
///         Err(SolveError::PartNotImplemented(part))
///     }
/// }
///
/// aoc_solver::inventory::submit! {
///     SolverPlugin {
///         year: 2023,
///         day: 1,
///         solver: &Day1Solver,
///         tags: &["2023", "easy"],
///     }
/// }
/// ```
pub struct SolverPlugin {
    /// The Advent of Code year
    pub year: u16,
    /// The day number (1-25)
    pub day: u8,
    /// The solver instance (type-erased)
    pub solver: &'static dyn RegisterableSolver,
    /// Tags for filtering (e.g., "2022", "geometry")
    pub tags: &'static [&'static str],
}

inventory::collect!(SolverPlugin);

// ============================================================================
// Builder and Registry
// ============================================================================

/// Builder for constructing a [`SolverRegistry`]
///
/// Storage is a flat Vec indexed by year/day, pre-allocated for 2015-2034.
/// The registry is immutable once built.
///
/// ```no_run
/// # use aoc_solver::SolverRegistryBuilder;
/// let registry = SolverRegistryBuilder::new()
///     .register_solver_plugins(|plugin| plugin.tags.contains(&"2022"))
///     .unwrap()
///     .build();
/// ```
pub struct SolverRegistryBuilder {
    entries: Vec<Option<SolverFactoryEntry>>,
}

impl SolverRegistryBuilder {
    /// Create a new empty registry builder with pre-allocated storage
    pub fn new() -> Self {
        Self {
            entries: (0..CAPACITY).map(|_| None).collect(),
        }
    }

    /// Register a solver factory with explicit parts count
    ///
    /// # Returns
    /// * `Err(RegistrationError::InvalidYearDay)` - year/day out of bounds
    /// * `Err(RegistrationError::DuplicateSolver)` - year/day already registered
    pub fn register_factory<F>(
        mut self,
        year: u16,
        day: u8,
        parts: u8,
        factory: F,
    ) -> Result<Self, RegistrationError>
    where
        F: for<'a> Fn(&'a str) -> Result<Box<dyn DynSolver + 'a>, ParseError>
            + Send
            + Sync
            + 'static,
    {
        let index = calc_index(year, day).ok_or(RegistrationError::InvalidYearDay(year, day))?;

        if self.entries[index].is_some() {
            return Err(RegistrationError::DuplicateSolver(year, day));
        }

        self.entries[index] = Some(SolverFactoryEntry {
            factory: Box::new(factory),
            parts,
        });
        Ok(self)
    }

    /// Register all collected solver plugins
    pub fn register_all_plugins(self) -> Result<Self, RegistrationError> {
        self.register_solver_plugins(|_| true)
    }

    /// Register solver plugins that match the given filter predicate
    ///
    /// ```ignore
    /// // Register only 2021 solvers
    /// let registry = SolverRegistryBuilder::new()
    ///     .register_solver_plugins(|plugin| plugin.year == 2021)?
    ///     .build();
    /// ```
    pub fn register_solver_plugins<F>(mut self, filter: F) -> Result<Self, RegistrationError>
    where
        F: Fn(&SolverPlugin) -> bool,
    {
        for plugin in inventory::iter::<SolverPlugin>() {
            if filter(plugin) {
                self = plugin.solver.register_with(self, plugin.year, plugin.day)?;
            }
        }
        Ok(self)
    }

    /// Build the immutable registry
    pub fn build(self) -> SolverRegistry {
        SolverRegistry {
            storage: SolverFactoryStorage {
                entries: self.entries,
            },
        }
    }
}

impl Default for SolverRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable storage for solver factories with O(1) access
pub struct SolverFactoryStorage {
    entries: Vec<Option<SolverFactoryEntry>>,
}

impl SolverFactoryStorage {
    /// Iterate over metadata for all registered factories, ordered by year then day
    pub fn iter_info(&self) -> impl Iterator<Item = FactoryInfo> + '_ {
        self.entries.iter().enumerate().filter_map(|(i, entry)| {
            entry.as_ref().map(|e| {
                let (year, day) = from_index(i);
                FactoryInfo {
                    year,
                    day,
                    parts: e.parts,
                }
            })
        })
    }

    /// Get metadata for a specific factory
    pub fn get_info(&self, year: u16, day: u8) -> Option<FactoryInfo> {
        calc_index(year, day)
            .and_then(|i| self.entries.get(i)?.as_ref())
            .map(|e| FactoryInfo {
                year,
                day,
                parts: e.parts,
            })
    }

    /// Check if a factory exists for year/day
    pub fn contains(&self, year: u16, day: u8) -> bool {
        self.get_info(year, day).is_some()
    }

    /// Get the number of registered factories
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Check if storage is empty
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|e| e.is_none())
    }
}

/// Immutable registry for looking up and creating solvers
pub struct SolverRegistry {
    storage: SolverFactoryStorage,
}

impl SolverRegistry {
    /// Get readonly access to the factory storage for iteration/lookup
    pub fn storage(&self) -> &SolverFactoryStorage {
        &self.storage
    }

    /// Create a solver instance by invoking the factory for a specific year/day
    ///
    /// # Returns
    /// * `Err(SolverError::InvalidYearDay)` - year/day out of bounds
    /// * `Err(SolverError::NotFound)` - nothing registered for year/day
    /// * `Err(SolverError::ParseError)` - the input did not parse
    pub fn create_solver<'a>(
        &self,
        year: u16,
        day: u8,
        input: &'a str,
    ) -> Result<Box<dyn DynSolver + 'a>, SolverError> {
        let index = calc_index(year, day).ok_or(SolverError::InvalidYearDay(year, day))?;

        let entry = self
            .storage
            .entries
            .get(index)
            .and_then(|e| e.as_ref())
            .ok_or(SolverError::NotFound(year, day))?;

        (entry.factory)(input).map_err(SolverError::ParseError)
    }
}

/// Macro to register a solver type with a registry builder
///
/// ```
/// use aoc_solver::{AocParser, register_solver, ParseError, SolverRegistryBuilder, SolveError, Solver};
///
/// struct MyDay1Solver;
///
/// impl AocParser for MyDay1Solver {
///     type SharedData<'a> = ();
///
///     fn parse(_: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         Ok(())
///     }
/// }
///
/// impl Solver for MyDay1Solver {
///     const PARTS: u8 = 1;
///
///     fn solve_part(_: &mut Self::SharedData<'_>, _: u8) -> Result<String, SolveError> {
///         Ok("done".to_string())
///     }
/// }
///
/// let mut builder = SolverRegistryBuilder::new();
/// register_solver!(builder, MyDay1Solver, 2023, 1);
/// let registry = builder.build();
/// assert!(registry.storage().contains(2023, 1));
/// ```
#[macro_export]
macro_rules! register_solver {
    ($builder:expr, $solver:ty, $year:expr, $day:expr) => {
        $builder = $builder
            .register_factory(
                $year,
                $day,
                <$solver as $crate::Solver>::PARTS,
                |input: &str| {
                    let instance = $crate::SolverInstance::<$solver>::new($year, $day, input)?;
                    Ok(Box::new(instance))
                },
            )
            .expect("Failed to register solver");
    };
}
