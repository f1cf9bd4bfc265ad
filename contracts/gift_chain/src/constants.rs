/// Inclusive bounds on a gift message, in characters.
pub const MIN_MESSAGE_LEN: u32 = 3;
pub const MAX_MESSAGE_LEN: u32 = 50;
/// A UTF-8 character takes at most four bytes.
pub const MAX_MESSAGE_BYTES: u32 = MAX_MESSAGE_LEN * 4;

/// Campaign text limits, in bytes. The title cap only bounds the size of the
/// stored campaign entry.
pub const MAX_TITLE_LEN: u32 = 100;
pub const MAX_DESCRIPTION_LEN: u32 = 50;

/// Smallest batch accepted by `create_bulk_gifts`.
pub const MIN_BULK_SIZE: u32 = 5;
