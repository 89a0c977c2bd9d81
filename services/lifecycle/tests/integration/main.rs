mod helpers;
mod registry_test;
mod uniqueness_test;
