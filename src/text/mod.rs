pub mod position;

pub use position::{
    PositionMapper, compute_line_starts, convert_byte_to_utf16_in_line,
    convert_utf16_to_byte_in_line, range_contains, range_strictly_contains, utf16_len,
};
