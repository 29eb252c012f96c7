pub mod columns;
pub mod enums;
pub mod error;
pub mod options;
pub mod person;

pub use enums::{AgeBand, PeriodKind, SourceKind, SurvivalStatus, VaccinationStatus};
pub use error::{ModelError, Result};
pub use options::{DEFAULT_PERSONS_PER_CHUNK, ProcessingOptions};
pub use person::{BEFORE_WINDOW, CanonicalPerson, DOSE_COUNT, DeathIndex, MAX_PERIOD};
