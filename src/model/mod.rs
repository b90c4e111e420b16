pub mod employee;
pub mod line_item;
pub mod payslip;
