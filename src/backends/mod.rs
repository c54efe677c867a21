// SPDX-License-Identifier: GPL-3.0-only

//! Backend abstraction layer for image acquisition
//!
//! # Modules
//!
//! - [`capture`]: platform camera, webcam and file picker sources behind one
//!   capability interface

pub mod capture;
