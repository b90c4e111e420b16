pub mod calendar;
pub mod employee_cache;
