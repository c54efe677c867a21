// SPDX-License-Identifier: GPL-3.0-only

//! Processing pipelines
//!
//! - [`photo`]: frame decoding and JPEG encoding for camera captures

pub mod photo;
