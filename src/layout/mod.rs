//! # Sheet Layout
//!
//! A sheet is a cover page followed by pages of identical-size label cells.
//! Nothing here flows: every label owns a fixed cell, so the only layout
//! decisions are which cell a record lands in and what size its text can be
//! set at to stay inside that cell.
//!
//! - [`grid`] maps record indices to pages and cells.
//! - [`label`] builds the per-copy draw plans for a record.
//! - [`cover`] centers and shrinks the cover title lines.

pub mod cover;
pub mod grid;
pub mod label;

pub use cover::{CoverPageComposer, LogoBox, PlacedTitle, TitleLine};
pub use grid::{CellPosition, CoverGeometry, GeometrySpec, GridLayout};
pub use label::{BarcodePlacement, DrawPlan, LabelComposer, LabelContent, LayoutRule, PlacedText};
