//! The line chart of transaction amounts.
//!
//! The chart is described as an ECharts option object generated with
//! `charming`. The browser side only needs the option JSON and a container.

use charming::{
    Chart,
    component::{Axis, Grid, Legend},
    element::{AxisPointer, AxisPointerType, AxisType, Tooltip, Trigger},
    series::Line,
};
use maud::{Markup, PreEscaped, html};

use crate::{
    html::{CARD_HEADING_STYLE, CARD_STYLE},
    ledger::derived::ChartPoint,
};

/// The HTML element ID of the chart container.
pub const CHART_ID: &str = "transactions-chart";

/// The global that holds the chart currently on the page.
const CHART_GLOBAL: &str = "ledgerChart";

/// The global flag set once the window resize listener is registered.
const RESIZE_FLAG: &str = "ledgerChartResize";

/// The URL of the ECharts library the chart script depends on.
pub const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// Build the ECharts options for `series`.
///
/// Points are plotted in the order given, so a newest-first series is drawn
/// newest-first.
pub fn transactions_chart(series: &[ChartPoint]) -> Chart {
    let dates = series
        .iter()
        .map(|point| point.date.clone())
        .collect::<Vec<_>>();
    let amounts = series.iter().map(|point| point.amount).collect::<Vec<_>>();

    Chart::new()
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Line)),
        )
        .legend(Legend::new())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(dates))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Line::new().name("Amount").data(amounts))
}

/// Renders the chart container and the script that draws `chart` into it.
///
/// The script runs immediately rather than on `DOMContentLoaded` so that it
/// also runs when htmx swaps the ledger in after a change. The chart drawn by
/// the previous swap is disposed and the resize listener is only added once
/// per page load.
pub fn chart_view(chart: &Chart) -> Markup {
    let script = format!(
        r#"(function() {{
            const chartDom = document.getElementById("{CHART_ID}");
            if (!chartDom || typeof echarts === "undefined") {{
                return;
            }}
            if (window.{CHART_GLOBAL}) {{
                window.{CHART_GLOBAL}.dispose();
            }}
            const chart = echarts.init(chartDom);
            const option = {chart};
            chart.setOption(option);
            window.{CHART_GLOBAL} = chart;

            if (!window.{RESIZE_FLAG}) {{
                window.{RESIZE_FLAG} = true;
                window.addEventListener('resize', () => {{
                    if (window.{CHART_GLOBAL}) {{
                        window.{CHART_GLOBAL}.resize();
                    }}
                }});
            }}
        }})();"#
    );

    html! {
        section id="chart" class={ "mt-6 " (CARD_STYLE) }
        {
            h2 class=(CARD_HEADING_STYLE) { "Transactions Chart" }

            div id=(CHART_ID) class="min-h-[300px] w-full" {}

            script { (PreEscaped(script)) }
        }
    }
}
