// News retrieval: search for candidate article URLs, download pages, and
// turn raw HTML into plain-text articles.
//
// The NewsSource trait is the network seam; GoogleNewsSource is the live
// implementation. Parsing (search results and article pages) is pure and
// lives in its own modules so it can be tested against fixture HTML.

pub mod article;
pub mod extract;
pub mod google;
pub mod search;
pub mod traits;

pub use article::Article;
pub use traits::NewsSource;
