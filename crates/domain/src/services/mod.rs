//! Domain services for Selka.
//!
//! Services contain business logic that operates on domain models.

pub mod quran_import;
pub mod slot_allocator;

pub use quran_import::{
    ensure_rows, parse_hizb_index, parse_quran_text, parse_text_line, ImportError, ParsedText,
};
pub use slot_allocator::{
    compute_next_slot, find_overlap, group_progress, validate_range, SlotError,
};
