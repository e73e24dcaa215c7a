mod model;

pub use model::{
    CONTENT_FILE, Config, DEFAULT_AUTHOR, DEFAULT_TITLE, OUTPUT_FILE, TEMPLATE_FILE,
};
