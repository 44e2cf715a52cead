//! The card request data model.

pub mod model;
