use crate::domain::kits::Producibility;
use crate::domain::models::MaterialKit;
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn kits_page(project: &str, report: &[(&MaterialKit, Producibility)]) -> Markup {
    desktop_layout(
        "Material kits",
        html! {
            main class="container" {
                h1 { "Material kits" }
                p class="muted" { "Stock of project " strong { (project) } }

                @if report.is_empty() {
                    p { "No kits defined." }
                }

                @for (kit, result) in report {
                    section class="card" {
                        h3 { (kit.name) }
                        p { "Kits available from stock: " strong { (result.producible_count) } }

                        @if result.pending_items.is_empty() {
                            p { "Stock covers the next kit." }
                        } @else {
                            p { "Short for kit #" (result.producible_count + 1) ":" }
                            table class="table" {
                                thead {
                                    tr {
                                        th { "Material" }
                                        th { "In stock" }
                                        th { "Still needed" }
                                    }
                                }
                                tbody {
                                    @for item in &result.pending_items {
                                        tr {
                                            td { (item.material_name) }
                                            td { (item.in_stock) }
                                            td { (item.needed) }
                                        }
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
