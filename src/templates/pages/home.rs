// templates/pages/home.rs

use crate::domain::aggregate::Summary;
use crate::domain::badges::overall_badge;
use crate::templates::{
    badge,
    components::{card, href},
    desktop_layout, progress_bar,
};
use maud::{html, Markup};

pub struct BuildingRow {
    pub project_name: String,
    pub building_name: String,
    pub summary: Summary,
}

pub fn home_page(buildings: &[BuildingRow]) -> Markup {
    desktop_layout(
        "Buildings",
        html! {
            main class="container" {
                h1 { "Buildings" }

                @if buildings.is_empty() {
                    (card("Nothing assigned yet", html! {
                        p { "Import work tiles, assignments and flats to see progress here." }
                    }))
                } @else {
                    table class="table" {
                        thead {
                            tr {
                                th { "Project" }
                                th { "Building" }
                                th { "Tasks" }
                                th { "Progress" }
                                th { "Status" }
                                th {}
                            }
                        }
                        tbody {
                            @for row in buildings {
                                tr {
                                    td { (row.project_name) }
                                    td { (row.building_name) }
                                    td { (row.summary.task_count) }
                                    td { (progress_bar(row.summary.progress)) }
                                    td { (badge(overall_badge(row.summary.stage))) }
                                    td {
                                        a href=(href("/board", &[("project", &row.project_name), ("building", &row.building_name)])) { "Board" }
                                        " · "
                                        a href=(href("/kits", &[("project", &row.project_name)])) { "Kits" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
