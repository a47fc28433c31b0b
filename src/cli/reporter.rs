// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use super::LoadResult;
use crate::geometry::{
    EdgeId, EdgeIncidence, FaceId, FaceIncidence, GeometryWarning, TopologyStats,
    VertexId, VertexIncidence,
};
use colored::*;
use nalgebra::Point3;
use std::time::Duration;

/// Cap on warnings printed before summarising the rest
const MAX_LISTED_WARNINGS: usize = 10;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report a loaded mesh with its statistics and timing
    pub fn report_load(file: &str, result: &LoadResult, stats: &TopologyStats) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "File:".bold(), file.cyan());
        if let Some(ref name) = result.name {
            println!("{} {}", "Name:".bold(), name);
        }
        println!("{} {:?}", "Encoding:".bold(), result.encoding);
        println!("{}", "━".repeat(80).bright_black());

        if stats.is_closed {
            println!("{} {}", "✅".green(), "Closed 2-manifold surface".green().bold());
        } else {
            println!("{} {}", "⚠️ ".yellow(), "Open or non-manifold surface".yellow().bold());
        }

        println!("\n{}", "Topology:".bold());
        Self::print_count("Vertices", stats.vertex_count, false);
        Self::print_count("Edges", stats.edge_count, false);
        Self::print_count("Faces", stats.face_count, false);
        Self::print_count("Boundary edges", stats.boundary_edges, true);
        Self::print_count("Non-manifold edges", stats.non_manifold_edges, true);
        Self::print_count("Degenerate faces", stats.degenerate_faces, true);
        println!(
            "  {} {}",
            "Euler (V-E+F):".bright_black(),
            stats.euler_characteristic.to_string().cyan()
        );

        println!("\n{}", "Performance:".bold());
        println!(
            "  {} {:>8} | {} {:>8}",
            "Decode:".bright_black(),
            Self::format_duration(result.decode_time).yellow(),
            "Topology:".bright_black(),
            Self::format_duration(result.build_time).cyan(),
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    pub fn report_vertex(id: VertexId, position: &Point3<f32>, incidence: &VertexIncidence) {
        println!(
            "{} {}  ({}, {}, {})",
            "Vertex".bold(),
            id.to_string().cyan(),
            position.x,
            position.y,
            position.z
        );
        println!("  {} {:?}", "Edges:".bright_black(), incidence.edges);
        println!("  {} {:?}", "Faces:".bright_black(), incidence.faces);
    }

    pub fn report_edge(id: EdgeId, incidence: &EdgeIncidence) {
        println!(
            "{} {}  {} - {}",
            "Edge".bold(),
            id.to_string().cyan(),
            incidence.vertices[0],
            incidence.vertices[1]
        );
        println!("  {} {:?}", "Faces:".bright_black(), incidence.faces);
        let kind = match incidence.faces.len() {
            1 => "boundary".yellow(),
            2 => "manifold".green(),
            _ => "non-manifold".red(),
        };
        println!("  {} {}", "Kind:".bright_black(), kind);
    }

    pub fn report_face(id: FaceId, incidence: &FaceIncidence) {
        println!("{} {}", "Face".bold(), id.to_string().cyan());
        println!("  {} {:?}", "Vertices:".bright_black(), incidence.vertices);
        println!("  {} {:?}", "Edges:".bright_black(), incidence.edges);
        println!("  {} {:?}", "Adjacent:".bright_black(), incidence.adjacent);
    }

    pub fn report_warnings(warnings: &[GeometryWarning]) {
        if warnings.is_empty() {
            return;
        }
        Self::report_warning(&format!("{} geometry warning(s)", warnings.len()));
        for warning in warnings.iter().take(MAX_LISTED_WARNINGS) {
            println!("  {} {}", "•".yellow(), warning);
        }
        if warnings.len() > MAX_LISTED_WARNINGS {
            println!(
                "  {}",
                format!("... and {} more", warnings.len() - MAX_LISTED_WARNINGS).bright_black()
            );
        }
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Report info
    pub fn report_info(message: &str) {
        println!("{} {}", "ℹ️".bright_blue(), message);
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }

    /// Counts flagged as problems turn red when non-zero
    fn print_count(name: &str, value: usize, is_problem: bool) {
        let formatted = if is_problem && value > 0 {
            value.to_string().red()
        } else if is_problem {
            value.to_string().green()
        } else {
            value.to_string().cyan()
        };
        println!("  {} {}", format!("{}:", name).bright_black(), formatted);
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(
            Reporter::format_duration(Duration::from_micros(500)),
            "500µs"
        );
        assert_eq!(
            Reporter::format_duration(Duration::from_millis(5)),
            "5.00ms"
        );
        assert_eq!(Reporter::format_duration(Duration::from_secs(2)), "2.00s");
    }
}
