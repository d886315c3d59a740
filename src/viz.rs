//! Chart rendering with Plotters and console reporting

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::aggregate::{CategorySum, HourSum};
use crate::data::DailyRecord;
use crate::features::FeaturePair;
use crate::model::{ElbowPoint, KMeansModel, ELBOW_MAX_K};
use crate::pipeline::DashboardData;

/// Color per cluster label.
const CLUSTER_COLORS: [RGBColor; 5] = [RED, BLUE, GREEN, YELLOW, MAGENTA];

/// Render the whole chart sequence next to `base_path`.
///
/// The cluster scatter lands at `base_path` itself; the remaining charts get
/// a suffix before the extension.
pub fn generate_dashboard_report(data: &DashboardData, base_path: &str) -> crate::Result<()> {
    render_cluster_scatter(&data.daily, data.features, &data.clustering, base_path)?;
    render_hour_charts(
        &data.busiest_hours,
        &data.quietest_hours,
        &suffixed(base_path, "_hours"),
    )?;
    render_category_chart(
        &data.season_totals,
        "Rentals by Season",
        GREEN,
        &suffixed(base_path, "_seasons"),
    )?;
    render_category_chart(
        &data.weather_totals,
        "Rentals by Weather",
        BLUE,
        &suffixed(base_path, "_weather"),
    )?;
    render_elbow_chart(&data.elbow, &suffixed(base_path, "_elbow"))?;
    render_rider_trend(&data.daily, &suffixed(base_path, "_trend"))?;
    Ok(())
}

/// Busiest and quietest hours side by side, value labels above the bars.
pub fn render_hour_charts(
    busiest: &[HourSum],
    quietest: &[HourSum],
    output_path: &str,
) -> crate::Result<()> {
    let root = BitMapBackend::new(output_path, (1400, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let panels = root.split_evenly((1, 2));
    draw_hour_panel(&panels[0], "Busiest Hours", busiest, BLUE)?;
    draw_hour_panel(&panels[1], "Quietest Hours", quietest, RED)?;

    root.present()?;
    println!("Hourly activity chart saved to: {output_path}");
    Ok(())
}

fn draw_hour_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    title: &str,
    rows: &[HourSum],
    color: RGBColor,
) -> crate::Result<()> {
    let y_max = rows.iter().map(|r| r.total).max().unwrap_or(1).max(1) as f64;

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..(rows.len().max(1) as f64), 0f64..(y_max * 1.15))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(rows.len().max(1))
        .x_label_formatter(&|x| {
            let index = x.floor() as usize;
            rows.get(index)
                .map(|r| format!("{:02}:00", r.hour))
                .unwrap_or_default()
        })
        .x_desc("Hour")
        .y_desc("Total Rentals")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for (i, row) in rows.iter().enumerate() {
        let left = i as f64 + 0.15;
        let right = i as f64 + 0.85;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, 0.0), (right, row.total as f64)],
            color.filled(),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            row.total.to_string(),
            (left + 0.1, row.total as f64 + y_max * 0.03),
            ("sans-serif", 14),
        )))?;
    }

    Ok(())
}

/// One bar per observed category, value labels above the bars.
pub fn render_category_chart(
    rows: &[CategorySum],
    title: &str,
    color: RGBColor,
    output_path: &str,
) -> crate::Result<()> {
    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = rows.iter().map(|r| r.total).max().unwrap_or(1).max(1) as f64;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..(rows.len().max(1) as f64), 0f64..(y_max * 1.15))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(rows.len().max(1))
        .x_label_formatter(&|x| {
            let index = x.floor() as usize;
            rows.get(index).map(|r| r.category.clone()).unwrap_or_default()
        })
        .y_desc("Total Rentals")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for (i, row) in rows.iter().enumerate() {
        let left = i as f64 + 0.15;
        let right = i as f64 + 0.85;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, 0.0), (right, row.total as f64)],
            color.filled(),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            row.total.to_string(),
            (left + 0.1, row.total as f64 + y_max * 0.03),
            ("sans-serif", 14),
        )))?;
    }

    root.present()?;
    println!("Category chart saved to: {output_path}");
    Ok(())
}

/// Inertia against cluster count, for eyeballing the elbow.
pub fn render_elbow_chart(curve: &[ElbowPoint], output_path: &str) -> crate::Result<()> {
    let root = BitMapBackend::new(output_path, (800, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = curve
        .iter()
        .map(|p| p.inertia)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption("Elbow Curve", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0.5f64..(ELBOW_MAX_K as f64 + 0.5), 0f64..(y_max * 1.1))?;

    chart
        .configure_mesh()
        .x_labels(ELBOW_MAX_K)
        .x_label_formatter(&|x| format!("{}", x.round() as usize))
        .x_desc("Cluster Count")
        .y_desc("Within-Cluster Sum of Squares")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    chart.draw_series(
        LineSeries::new(curve.iter().map(|p| (p.k as f64, p.inertia)), &BLUE).point_size(4),
    )?;

    root.present()?;
    println!("Elbow chart saved to: {output_path}");
    Ok(())
}

/// Scatter of the selected features in raw units, colored by cluster label.
pub fn render_cluster_scatter(
    daily: &[DailyRecord],
    pair: FeaturePair,
    model: &KMeansModel,
    output_path: &str,
) -> crate::Result<()> {
    let xs: Vec<f64> = daily.iter().map(|r| pair.x.value(r)).collect();
    let ys: Vec<f64> = daily.iter().map(|r| pair.y.value(r)).collect();

    let (x_min, x_max) = padded_bounds(&xs);
    let (y_min, y_max) = padded_bounds(&ys);

    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let title = format!("Clusters: {} vs {}", pair.x.label(), pair.y.label());
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc(pair.x.label())
        .y_desc(pair.y.label())
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for cluster in 0..model.n_clusters {
        let color = CLUSTER_COLORS[cluster % CLUSTER_COLORS.len()];
        let points: Vec<(f64, f64)> = model
            .labels
            .iter()
            .enumerate()
            .filter(|(_, &label)| label == cluster)
            .map(|(i, _)| (xs[i], ys[i]))
            .collect();

        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
            )?
            .label(format!("Cluster {cluster}"))
            .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
    }

    chart.configure_series_labels().draw()?;

    root.present()?;
    println!("Cluster scatter saved to: {output_path}");
    Ok(())
}

/// Registered vs casual riders over the selected range.
pub fn render_rider_trend(daily: &[DailyRecord], output_path: &str) -> crate::Result<()> {
    let first = daily.iter().map(|r| r.date).min();
    let last = daily.iter().map(|r| r.date).max();
    let (Some(first), Some(last)) = (first, last) else {
        anyhow::bail!("cannot render rider trend for an empty daily set");
    };

    let y_max = daily
        .iter()
        .map(|r| r.registered.max(r.casual))
        .max()
        .unwrap_or(1)
        .max(1);
    let y_max = (y_max as f64 * 1.1) as i64 + 1;

    let root = BitMapBackend::new(output_path, (1200, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Registered vs Casual Riders", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(first..last, 0i64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Riders")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            daily.iter().map(|r| (r.date, r.registered)),
            &GREEN,
        ))?
        .label("Registered")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));

    chart
        .draw_series(LineSeries::new(
            daily.iter().map(|r| (r.date, r.casual)),
            &RED,
        ))?
        .label("Casual")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart.configure_series_labels().draw()?;

    root.present()?;
    println!("Rider trend chart saved to: {output_path}");
    Ok(())
}

/// Print the dashboard's summary metrics and cluster statistics.
pub fn print_summary(data: &DashboardData) {
    println!("\n=== Rental Summary ===");
    println!(
        "Selected range: {} to {}",
        data.range.start(),
        data.range.end()
    );
    println!("Total rentals:     {}", data.totals.total);
    println!("Casual riders:     {}", data.totals.casual);
    println!("Registered riders: {}", data.totals.registered);

    println!("\nBusiest hours:");
    for row in &data.busiest_hours {
        println!("  {:02}:00  {:>8}", row.hour, row.total);
    }
    println!("Quietest hours:");
    for row in &data.quietest_hours {
        println!("  {:02}:00  {:>8}", row.hour, row.total);
    }

    println!("\nRentals by season:");
    for row in &data.season_totals {
        println!("  {:<16} {:>8}", row.category, row.total);
    }
    println!("Rentals by weather:");
    for row in &data.weather_totals {
        println!("  {:<16} {:>8}", row.category, row.total);
    }

    println!("\n=== Cluster Statistics ===");
    println!(
        "Features: {} vs {}",
        data.features.x.label(),
        data.features.y.label()
    );
    println!(
        "Within-cluster sum of squares: {:.2}",
        data.clustering.inertia
    );

    let sizes = data.clustering.cluster_sizes();
    let total_days = data.daily.len().max(1);
    for (cluster, &size) in sizes.iter().enumerate() {
        let percentage = (size as f64 / total_days as f64) * 100.0;
        println!("  Cluster {cluster}: {size} days ({percentage:.1}%)");
    }

    println!("\nElbow curve:");
    for point in &data.elbow {
        println!("  k={}  inertia={:.2}", point.k, point.inertia);
    }
}

fn suffixed(base_path: &str, suffix: &str) -> String {
    base_path.replace(".png", &format!("{suffix}.png"))
}

fn padded_bounds(values: &[f64]) -> (f64, f64) {
    let min = values.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let max = values.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let pad = ((max - min) * 0.05).max(0.5);
    (min - pad, max + pad)
}
