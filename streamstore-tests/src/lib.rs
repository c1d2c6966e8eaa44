#[cfg(test)]
mod append_read_tests;


#[cfg(test)]
mod lifecycle_tests;
