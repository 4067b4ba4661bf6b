use crate::cli::{DatasetArgs, RecommendArgs, SummaryArgs};
use crate::infra::load_snapshot;
use std::fs::File;
use std::io::BufWriter;
use tn_counsel::config::AppConfig;
use tn_counsel::counselling::report::views::RecommendationView;
use tn_counsel::counselling::report::write_recommendations_csv;
use tn_counsel::counselling::{
    Category, DatasetSnapshot, RowFilter, ScoringRequest, Tier, TierSelection, TopTierSummary,
    WeightInputs,
};
use tn_counsel::error::AppError;

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        dataset,
        college_tiers,
        branch_tiers,
        district_tiers,
        district_weight,
        department_weight,
        branch_weight,
        college_weight,
        districts,
        departments,
        branches,
        colleges,
        limit,
        output,
    } = args;

    let snapshot = load_configured_snapshot(dataset)?;
    let request = ScoringRequest {
        college_tiers: TierSelection::from_user(college_tiers),
        branch_tiers: TierSelection::from_user(branch_tiers),
        district_tiers: TierSelection::from_user(district_tiers),
        weights: WeightInputs::new(district_weight, department_weight, branch_weight, college_weight)
            .validated()?,
    };
    let filter = RowFilter {
        districts,
        departments,
        branches,
        colleges,
    };

    let scored = snapshot.score(&request);
    let visible = filter.visible(&scored);

    println!("Counselling choice order {}", snapshot.year());
    println!(
        "Tiers rewarded: college [{}] | branch [{}] | district [{}]",
        tier_list(&request.college_tiers),
        tier_list(&request.branch_tiers),
        tier_list(&request.district_tiers)
    );
    let weights = request.weights.normalize();
    println!(
        "Weights: district {:.2} | department {:.2} | branch {:.2} | college {:.2}",
        weights.district, weights.department, weights.branch, weights.college
    );
    if filter.is_empty() {
        println!("Showing {} of {} rows", visible.len().min(limit), scored.len());
    } else {
        println!(
            "Showing {} of {} rows ({} match the filters)",
            visible.len().min(limit),
            scored.len(),
            visible.len()
        );
    }

    println!();
    for row in visible.iter().take(limit) {
        render_row(&row.to_view());
    }

    if let Some(path) = output {
        let file = File::create(&path)?;
        write_recommendations_csv(BufWriter::new(file), visible.iter().copied())?;
        println!("\nWrote {} rows to {}", visible.len(), path.display());
    }

    Ok(())
}

pub(crate) fn run_summary(args: SummaryArgs) -> Result<(), AppError> {
    let snapshot = load_configured_snapshot(args.dataset)?;
    let summary = TopTierSummary::from_rows(snapshot.master());

    println!("Top-tier summary {}", snapshot.year());
    for category in [
        Category::College,
        Category::Branch,
        Category::District,
        Category::Department,
    ] {
        let entries = summary.get(category);
        if entries.is_empty() {
            println!("\n{}: none", category.label());
            continue;
        }
        println!("\n{}", category.label());
        for entry in entries {
            println!(
                "- #{} {} (max OC cutoff {:.2})",
                entry.rank, entry.name, entry.max_cutoff
            );
        }
    }

    Ok(())
}

fn load_configured_snapshot(overrides: DatasetArgs) -> Result<DatasetSnapshot, AppError> {
    let mut config = AppConfig::load()?;
    overrides.apply(&mut config.dataset);
    load_snapshot(&config.dataset)
}

fn render_row(view: &RecommendationView) {
    println!(
        "{:>4}. {} - {} ({})",
        view.choose_order, view.college, view.branch, view.district
    );
    println!(
        "      tiers {}/{}/{} = {} | score {:.2} | OC cutoff {:.2} | college rank {}",
        tier_label(view.college_tier),
        tier_label(view.branch_tier),
        tier_label(view.district_tier),
        view.sum_of_tiers,
        view.final_score,
        view.oc_cutoff,
        view.college_rank
            .map(|rank| rank.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
}

fn tier_label(tier: Option<Tier>) -> &'static str {
    tier.map(|tier| tier.label()).unwrap_or("-")
}

fn tier_list(selection: &TierSelection) -> String {
    selection
        .tiers()
        .iter()
        .map(|tier| tier.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_labels_render_missing_tiers_as_dash() {
        assert_eq!(tier_label(Some(Tier::NextBest)), "Next-Best");
        assert_eq!(tier_label(None), "-");
    }

    #[test]
    fn tier_list_names_selected_tiers_in_order() {
        let selection = TierSelection::exact([Tier::Rest, Tier::Top]);
        assert_eq!(tier_list(&selection), "Top, Rest");
        assert_eq!(tier_list(&TierSelection::all()), "Top, Best, Next-Best, Rest");
    }
}
