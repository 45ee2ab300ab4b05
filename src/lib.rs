#![forbid(unsafe_code)]
//! Fireshifts — répartition des lignes de permanence ("téléphones") d'une garde.
//!
//! - Grille de disponibilités personnes × dates, validée à l'entrée.
//! - Modèle de contraintes : couverture, exclusivité, disponibilités, équité.
//! - Résolution MILP (good_lp / microlp), budget de temps optionnel.
//! - Décodage en planning date × rôle et bilan par personne.

/// Événement `tracing`, compilé seulement avec la feature `logging`.
macro_rules! log_event {
    ($level:ident, $($arg:tt)+) => {
        #[cfg(feature = "logging")]
        tracing::$level!($($arg)+);
    };
}

#[cfg(feature = "serde")]
pub mod io;
pub mod model;
pub mod report;
pub mod scheduler;

pub use model::{Availability, AvailabilityGrid, DateLabel, PersonId, Role};
pub use report::{TableRenderer, TextRenderer};
pub use scheduler::{
    build_model, decode, solve, MilpEngine, Model, Plan, SchedError, ScheduleTable, Scheduler,
    SolveOptions, SolveOutcome, SolveStatus, SolvingEngine, SummaryTable,
};
