use crate::api::employee::{EmployeeListResponse, EmployeeResponse};
use crate::api::payslip::{MessageResponse, PayslipListResponse, PayslipLookupResponse, PayslipResponse};
use crate::model::employee::{Address, Employee, EmployeeCode};
use crate::model::line_item::{HeadType, LineItem, RawLineItem};
use crate::model::payslip::{CreatePayslip, PayDetails, PayDetailsInput, Payslip, UpdatePayslip};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payslip API",
        version = "1.0.0",
        description = r#"
## Payslip Management

Create, edit and look up monthly payslips for employees.

### Key Features
- **Payslips**
  - Gross, deductions, net salary, loss of pay and in-hand salary computed on every save
  - One payslip per employee per month and year
  - Optional optimistic concurrency through `expectedVersion`
- **Employee prefill**
  - The latest payslip's earnings and deductions become the employee's defaults

### Response Format
- Success: `{"success": true, "data": ...}`
- Failure: `{"success": false, "message": "..."}`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::payslip::create_payslip,
        crate::api::payslip::list_payslips,
        crate::api::payslip::find_by_period,
        crate::api::payslip::get_payslip,
        crate::api::payslip::update_payslip,
        crate::api::payslip::delete_payslip,

        crate::api::employee::get_employee,
        crate::api::employee::list_employees
    ),
    components(
        schemas(
            HeadType,
            LineItem,
            RawLineItem,
            PayDetails,
            PayDetailsInput,
            Payslip,
            CreatePayslip,
            UpdatePayslip,
            PayslipResponse,
            PayslipListResponse,
            PayslipLookupResponse,
            MessageResponse,
            EmployeeCode,
            Address,
            Employee,
            EmployeeResponse,
            EmployeeListResponse
        )
    ),
    tags(
        (name = "Payslip", description = "Payslip management APIs"),
        (name = "Employee", description = "Employee prefill APIs"),
    )
)]
pub struct ApiDoc;
