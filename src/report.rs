//! Terminal report and saved copies of it.

use crate::engine::Recommendation;
use chrono::Utc;
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(title.len()));
}

/// Renders the plan, macro breakdown and health metrics sections.
pub fn render(rec: &Recommendation) -> String {
    let mut out = String::new();

    heading(&mut out, "YOUR PERSONALIZED DIET PLAN");
    let _ = writeln!(out, "Recommended Diet Type: {}", rec.diet_label);
    if rec.plan_label != rec.diet_label {
        let _ = writeln!(out, "(no meal plan for this type, showing {})", rec.plan_label);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "   Breakfast: {}", rec.breakfast);
    let _ = writeln!(out, "   Lunch: {}", rec.lunch);
    let _ = writeln!(out, "   Dinner: {}", rec.dinner);
    let _ = writeln!(out, "   Snacks: {}", rec.snacks);
    let _ = writeln!(out);

    heading(&mut out, "MACRONUTRIENT BREAKDOWN");
    let _ = writeln!(out, "   Calories: {} kcal", rec.macros.calories);
    let _ = writeln!(out, "   Protein: {}g", rec.macros.protein_g);
    let _ = writeln!(out, "   Carbs: {}g", rec.macros.carbs_g);
    let _ = writeln!(out, "   Fats: {}g", rec.macros.fats_g);
    let _ = writeln!(out);

    heading(&mut out, "HEALTH METRICS");
    let _ = writeln!(out, "Your BMI: {:.1}", rec.bmi);
    let _ = writeln!(out, "BMI Category: {}", rec.bmi_category);
    let _ = writeln!(out, "Estimated daily calories: {} kcal", rec.estimated_calories);
    if let Some(advice) = &rec.advisory_message {
        let _ = writeln!(out);
        let _ = writeln!(out, "{advice}");
    }

    out
}

/// Writes the report under `<results_dir>/<YYYY-MM-DD>/` and returns the file path.
pub fn save_report(results_dir: &Path, report: &str, user_profile: &str) -> std::io::Result<PathBuf> {
    let now = Utc::now();
    let date_dir = results_dir.join(now.format("%Y-%m-%d").to_string());
    std::fs::create_dir_all(&date_dir)?;

    let filename = date_dir.join(format!("recommendation_{}.txt", now.format("%H-%M-%S%.3f")));
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&filename)?;

    writeln!(file, "==========================================")?;
    writeln!(file, "DIET RECOMMENDATION")?;
    writeln!(file, "Generated: {}", now.format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(file, "==========================================")?;
    writeln!(file)?;
    writeln!(file, "USER PROFILE:")?;
    writeln!(file, "{user_profile}")?;
    writeln!(file)?;
    writeln!(file, "{report}")?;
    writeln!(file, "==========================================")?;

    Ok(filename)
}
