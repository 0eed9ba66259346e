//! Host-side integration harness for the two-node link
//!
//! [`scenarios::Rig`] owns everything both nodes share on a bench: one
//! virtual clock, the recorded CLOCK/DATA wire, the button bank and the
//! display outputs. Nodes are built on demand and borrow from it.

pub mod scenarios;

#[cfg(test)]
mod link_tests;
#[cfg(test)]
mod property_tests;
#[cfg(test)]
mod session_tests;
