//! drivebot - WhatsApp command bot for file operations on a drive
//!
//! Inbound messages arrive on a Twilio webhook, are parsed into one of a
//! closed set of commands, executed once against the drive, logged, and
//! answered with a TwiML reply.

pub mod application;
pub mod domain;
pub mod infrastructure;
