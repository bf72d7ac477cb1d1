//! Field and request limits -- Single Source of Truth
//!
//! These bounds are part of the tool contract; changing one changes the
//! public validation behavior.

/// Minimum work item / memory title length
pub const TITLE_MIN_LEN: usize = 1;
/// Maximum work item / memory title length
pub const TITLE_MAX_LEN: usize = 200;
/// Maximum description / requirements / solutions body length
pub const BODY_MAX_LEN: usize = 10_000;
/// Maximum notes length
pub const NOTES_MAX_LEN: usize = 1_000;

/// Minimum number of acceptance criteria for execution readiness
pub const CRITERIA_MIN_ITEMS: usize = 1;
/// Maximum number of acceptance criteria
pub const CRITERIA_MAX_ITEMS: usize = 10;
/// Minimum length of a single acceptance criterion
pub const CRITERION_MIN_LEN: usize = 5;
/// Maximum length of a single acceptance criterion
pub const CRITERION_MAX_LEN: usize = 500;

/// Maximum `ai_when_to_use` entries on an architecture item
pub const WHEN_TO_USE_MAX_ITEMS: usize = 10;
/// Maximum keywords on a memory item
pub const KEYWORDS_MAX_ITEMS: usize = 20;
/// Maximum `children_slugs` entries on an architecture item
pub const CHILDREN_SLUGS_MAX_ITEMS: usize = 50;
/// Maximum `related_slugs` entries on an architecture item
pub const RELATED_SLUGS_MAX_ITEMS: usize = 20;
/// Maximum linked epics on an architecture item
pub const LINKED_EPICS_MAX_ITEMS: usize = 20;

/// Hard cap for list pagination
pub const LIST_LIMIT_MAX: usize = 200;
/// Hard cap for search results
pub const SEARCH_LIMIT_MAX: usize = 50;
/// Default depth bound for hierarchy walks
pub const MAX_DEPTH_DEFAULT: usize = 10;
/// Upper bound of the progress percentage scale
pub const PROGRESS_MAX: u8 = 100;
