pub const TITLE_WIDTH: usize = 80;
pub const SELFTEXT_PREVIEW: usize = 160;
pub const COMMENT_WIDTH: usize = 400;
pub const RULE: &str = "------------------------------------------------------------";
