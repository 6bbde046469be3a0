// Domain layer: entities, money and the store port. No I/O here.

pub mod model;
pub mod money;
pub mod ports;

pub use model::{Cell, Department, Mail, Officer, OfficerPrisoner, Position, Prisoner, Weapon};
pub use money::{Cents, Money, RoundingMode};
pub use ports::{CommitSummary, PrisonerDetails, Store, SupervisingOfficer};
