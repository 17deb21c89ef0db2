//! Constants used throughout the report core crate.
//!
//! Page geometry is expressed in PDF points (1/72 inch).

/// Local storage key holding the raw session token.
pub const TOKEN_STORAGE_KEY: &str = "token";

/// Filename of the local storage file inside the data directory.
pub const LOCAL_STORAGE_FILENAME: &str = "local_storage.json";

/// Directory name used under the platform data directory.
pub const APP_DIR_NAME: &str = "clinic-report";

/// Fallback data directory when the platform has none.
pub const DEFAULT_DATA_DIR: &str = ".clinic-report";

/// Default authentication base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";

/// Maximum plain-text length of each rich-text section.
pub const MAX_RICH_TEXT_CHARS: usize = 5000;

/// Maximum length of clinic, physician and patient names.
pub const MAX_NAME_CHARS: usize = 50;

/// Prefix of exported report filenames.
pub const REPORT_FILE_PREFIX: &str = "CR";

/// Header shown when no clinic name is available.
pub const DEFAULT_REPORT_TITLE: &str = "Clinic Report";

/// A4 portrait.
pub const PAGE_WIDTH_PT: f32 = 595.28;
pub const PAGE_HEIGHT_PT: f32 = 841.89;

/// Page margins: top/bottom and left/right.
pub const PAGE_MARGIN_VERTICAL_PT: f32 = 60.0;
pub const PAGE_MARGIN_HORIZONTAL_PT: f32 = 20.0;

/// Inner padding of the printable view.
pub const VIEW_PADDING_HORIZONTAL_PT: f32 = 45.0;
pub const VIEW_PADDING_TOP_PT: f32 = 30.0;

/// Footer stamp: font size and distance of the baseline from the bottom edge.
pub const FOOTER_FONT_SIZE: f32 = 9.0;
pub const FOOTER_OFFSET_PT: f32 = 30.0;

/// Logo placement from the top-left corner, and its drawn size.
pub const LOGO_X_PT: f32 = 40.0;
pub const LOGO_Y_PT: f32 = 20.0;
pub const LOGO_WIDTH_PT: f32 = 80.0;
pub const LOGO_HEIGHT_PT: f32 = 40.0;

/// Auto-hide duration for success notifications.
pub const NOTIFICATION_AUTO_HIDE_MS: u64 = 1000;
