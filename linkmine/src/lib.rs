pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    ExtractOptions, ExtractProgressCallback, Extraction, OutputFormat, execute_extraction,
    load_urls_from_file, load_urls_from_source, parse_url_line, render_extraction,
    resolve_output_path,
};
