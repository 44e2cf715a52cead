//! Pure geometry: margins, background/logo placement, and the text band.

pub mod geometry;
