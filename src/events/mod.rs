//! Event types and observers used by the simulation.
//!
//! This module groups the domain events exchanged across systems and the
//! corresponding observers that react to them. Events provide a decoupled
//! way for systems to communicate without tight coupling or direct
//! dependencies.
//!
//! Submodules:
//! - [`animator`] – observers feeding jump triggers and push colliders to the animation side
//! - [`gravity`] – gravity direction requests and change notifications
//! - [`input`] – logical input actions and input inversion
//! - [`locomotion`] – character intents and locomotion notifications
pub mod animator;
pub mod gravity;
pub mod input;
pub mod locomotion;
