//! Crate-level tests driving the coordinator through recording collaborators.

mod property_tests;
