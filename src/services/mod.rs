pub mod digest;
pub mod epub;
pub mod keywords;
pub mod mailer;
pub mod pdf;
pub mod readwise;
pub mod reconstruct;
pub mod sanitize;
