pub mod axe;
pub mod driver;
pub mod webdriver;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;
