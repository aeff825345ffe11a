//! Adapters between the engine's trait seams and the concrete remote services.

mod badger;

pub use badger::BadgerLookup;
