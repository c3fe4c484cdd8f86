use crate::domain::aggregate::Summary;
use crate::domain::badges::{overall_badge, stage_badge};
use crate::domain::board::BuildingStatus;
use crate::templates::components::href;
use crate::templates::{badge, desktop_layout, progress_bar};
use maud::{html, Markup};

fn stage_counts(summary: &Summary) -> Markup {
    html! {
        @for (stage, n) in summary.counts.non_zero() {
            span class="count" { (badge(stage_badge(stage))) " " (n) }
        }
    }
}

pub fn board_page(status: &BuildingStatus<'_>) -> Markup {
    let project = status.project_name.as_str();
    let building = status.building_name.as_str();

    desktop_layout(
        &format!("{building} · {project}"),
        html! {
            main class="container" {
                h1 { (building) }
                p class="muted" { "Project " strong { (project) } }

                section class="card" {
                    h3 { "Building" }
                    (progress_bar(status.summary.progress))
                    " "
                    (badge(overall_badge(status.summary.stage)))
                    div { (stage_counts(&status.summary)) }
                    p {
                        a href=(href("/export", &[("project", project), ("building", building)])) { "Download status sheet" }
                    }
                }

                section class="card" {
                    h3 { "Work tiles" }
                    @if status.tiles.is_empty() {
                        p { "No work tiles are assigned to this building." }
                    } @else {
                        table class="table" {
                            thead {
                                tr {
                                    th { "Tile" }
                                    th { "Tasks" }
                                    th { "Progress" }
                                    th { "Status" }
                                    th { "Breakdown" }
                                }
                            }
                            tbody {
                                @for entry in &status.tiles {
                                    tr {
                                        td { (entry.tile.name) }
                                        td { (entry.summary.task_count) }
                                        td { (progress_bar(entry.summary.progress)) }
                                        td { (badge(overall_badge(entry.summary.stage))) }
                                        td { (stage_counts(&entry.summary)) }
                                    }
                                }
                            }
                        }
                    }
                }

                section class="card" {
                    h3 { "Flats" }
                    table class="table" {
                        thead {
                            tr {
                                th { "Floor" }
                                th { "Flat" }
                                th { "Type" }
                                th { "Progress" }
                                th { "Status" }
                            }
                        }
                        tbody {
                            @for flat in &status.flats {
                                tr {
                                    td { (flat.floor_name) }
                                    td {
                                        a href=(href("/flat", &[("project", project), ("building", building), ("flat", &flat.flat_no)])) { (flat.flat_no) }
                                    }
                                    td { (flat.flat_type) }
                                    td { (progress_bar(flat.summary.progress)) }
                                    td { (badge(overall_badge(flat.summary.stage))) }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
