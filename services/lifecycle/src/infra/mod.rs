pub mod captcha;
pub mod db;
