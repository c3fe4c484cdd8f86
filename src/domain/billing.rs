// src/domain/billing.rs

use crate::domain::models::ContractorBill;
use chrono::NaiveDate;

/// Date of the bill that covers a task instance.
///
/// Returns `None` when no bill lists the instance, even if the progress record
/// says it was billed. If several bills list it, the earliest date is returned.
pub fn find_billed_date(
    plan_id: &str,
    flat_no: &str,
    task_id: &str,
    bills: &[ContractorBill],
) -> Option<NaiveDate> {
    bills
        .iter()
        .filter(|bill| {
            bill.billed_items.iter().any(|item| {
                item.plan_id == plan_id && item.flat_no == flat_no && item.task_id == task_id
            })
        })
        .map(|bill| bill.date)
        .min()
}
