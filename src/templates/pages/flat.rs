use crate::auth::{Permission, PermissionCheck};
use crate::domain::badges::{overall_badge, stage_badge};
use crate::domain::board::{FlatStatus, TaskRow};
use crate::domain::logic::{is_billing_eligible, is_final_check_eligible};
use crate::templates::components::href;
use crate::templates::{badge, desktop_layout, progress_bar};
use maud::{html, Markup};

pub struct FlatVm<'a> {
    pub project_name: &'a str,
    pub building_name: &'a str,
    pub flat: &'a FlatStatus<'a>,
}

fn hidden_keys(vm: &FlatVm<'_>, row: &TaskRow<'_>) -> Markup {
    html! {
        input type="hidden" name="project" value=(vm.project_name);
        input type="hidden" name="building" value=(vm.building_name);
        input type="hidden" name="flat" value=(vm.flat.flat_no);
        input type="hidden" name="tile" value=(row.tile.id);
        input type="hidden" name="task" value=(row.task.id);
    }
}

fn actions(vm: &FlatVm<'_>, row: &TaskRow<'_>, perms: &dyn PermissionCheck) -> Markup {
    html! {
        @if row.instance.is_some() && perms.has_permission(Permission::Progress) {
            form action="/progress" method="post" class="inline" {
                (hidden_keys(vm, row))
                input type="number" name="progress" min="0" max="100" value=(row.progress) required;
                button type="submit" { "Update" }
            }
        }
        @if is_final_check_eligible(row.stage) && perms.has_permission(Permission::FinalCheck) {
            form action="/final-check" method="post" class="inline" {
                (hidden_keys(vm, row))
                button type="submit" { "Approve" }
            }
        }
        @if is_billing_eligible(row.stage) && perms.has_permission(Permission::Billing) {
            form action="/bill" method="post" class="inline" {
                (hidden_keys(vm, row))
                input type="number" name="rate" min="0" step="0.01" placeholder="Rate";
                button type="submit" { "Bill" }
            }
        }
    }
}

pub fn flat_page(vm: &FlatVm<'_>, perms: &dyn PermissionCheck) -> Markup {
    let flat = vm.flat;

    desktop_layout(
        &format!("Flat {}", flat.flat_no),
        html! {
            main class="container" {
                p {
                    a href=(href("/board", &[("project", vm.project_name), ("building", vm.building_name)])) {
                        "← " (vm.building_name)
                    }
                }
                h1 { "Flat " (flat.flat_no) }
                p class="muted" {
                    @if !flat.floor_name.is_empty() { (flat.floor_name) " · " }
                    (flat.flat_type)
                }

                section class="card" {
                    (progress_bar(flat.summary.progress))
                    " "
                    (badge(overall_badge(flat.summary.stage)))
                }

                section class="card" {
                    table class="table" {
                        thead {
                            tr {
                                th { "Tile" }
                                th { "Task" }
                                th { "Progress" }
                                th { "Stage" }
                                th { "Plan" }
                                th { "Billed on" }
                                th {}
                            }
                        }
                        tbody {
                            @for row in &flat.tasks {
                                tr {
                                    td { (row.tile.name) }
                                    td { (row.task.label) }
                                    td { (progress_bar(row.progress)) }
                                    td { (badge(stage_badge(row.stage))) }
                                    td { (row.plan_id().unwrap_or("—")) }
                                    td {
                                        @match row.billed_date {
                                            Some(date) => (date.format("%Y-%m-%d").to_string()),
                                            None => "—",
                                        }
                                    }
                                    td { (actions(vm, row, perms)) }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
