//! The content-block schema.
//!
//! A page body is an ordered stream of typed blocks. Stored bodies arrive in
//! the `{type, id, value}` encoding ([`RawBlock`]) and are validated field by
//! field into a [`Body`]. The set of block types is closed: [`LeafBlock`]
//! covers everything that may appear in any stream, and [`Block`] adds the
//! section container, whose inner stream only holds leaf blocks.

pub mod choices;
pub mod fields;
pub mod kinds;
pub mod stream;
pub mod types;
pub mod validate;

pub use choices::Choice;
pub use kinds::*;
pub use stream::{Body, RawBlock, RawBody, StreamBlock, StreamItem, read_body};
pub use types::{BODY_TYPES, Block, LEAF_TYPES, LeafBlock};
pub use validate::{FieldError, MediaCheck, TextRule, ValidationErrors, Validator};
