pub mod html;
pub mod newsapi;
pub mod speech;
pub mod url_norm;
