pub mod formatter;

pub use formatter::{
    format_ranked_table, format_record_detail, format_score, format_since, should_use_colors,
};
