use clap::Args;
use maturity_ai::analysis::AnalysisPrompt;
use maturity_ai::assessment::{
    score_answers, AnswerSet, MaturityTier, QuestionnaireBlueprint, RespondentProfile,
};
use maturity_ai::error::AppError;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Path to a JSON file of answers ({"strategy_1": 4, ...}). Defaults to a
    /// canned mid-maturity submission.
    #[arg(long)]
    pub(crate) answers: Option<PathBuf>,
    /// Company name used in the demo profile
    #[arg(long, default_value = "Demo Manufacturing Co")]
    pub(crate) company: String,
    /// Industry used in the demo profile
    #[arg(long, default_value = "Manufacturing")]
    pub(crate) industry: String,
    /// Print the full analysis prompt instead of a preview
    #[arg(long)]
    pub(crate) show_prompt: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        answers,
        company,
        industry,
        show_prompt,
    } = args;

    let answers = match answers {
        Some(path) => load_answers(&path)?,
        None => canned_answers(),
    };

    let blueprint = QuestionnaireBlueprint::standard();
    let scores = score_answers(&answers, &blueprint);
    let tier = MaturityTier::for_overall(scores.overall);

    let profile = RespondentProfile {
        full_name: "Demo Respondent".to_string(),
        job_title: "Director of Operations".to_string(),
        company_name: company,
        company_size: "201-500".to_string(),
        industry,
    };

    println!("Data maturity assessment demo");
    println!(
        "Respondent: {} ({}) at {}",
        profile.full_name, profile.job_title, profile.company_name
    );
    println!(
        "Answered {} of {} questions",
        answers.len(),
        blueprint.question_count()
    );

    println!("\nDimension scores");
    for section in blueprint.sections() {
        let score = scores
            .dimensions
            .get(&section.dimension)
            .copied()
            .unwrap_or(1.0);
        println!("- {}: {:.1}/5.0", section.dimension.label(), score);
    }

    println!(
        "\nOverall: {:.2}/5.00 -> {} (level {}/5)",
        scores.overall,
        tier.label(),
        tier.level()
    );

    let prompt = AnalysisPrompt::build(&profile, &scores, tier);
    if show_prompt {
        println!("\nSystem message\n{}", prompt.system);
        println!("\nUser message\n{}", prompt.user);
    } else {
        let preview: String = prompt.user.chars().take(400).collect();
        println!("\nPrompt preview (pass --show-prompt for the full text)\n{preview}...");
    }

    Ok(())
}

fn load_answers(path: &PathBuf) -> Result<AnswerSet, AppError> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|err| {
        AppError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("failed to parse {} as an answer set: {err}", path.display()),
        ))
    })
}

fn canned_answers() -> AnswerSet {
    [
        ("strategy_1", 4),
        ("strategy_2", 3),
        ("strategy_3", 4),
        ("governance_1", 2),
        ("governance_2", 2),
        ("governance_3", 3),
        ("architecture_1", 3),
        ("architecture_2", 3),
        ("architecture_3", 4),
        ("analytics_1", 3),
        ("analytics_2", 2),
        ("analytics_3", 3),
        ("team_1", 3),
        ("team_2", 3),
        ("team_3", 2),
        ("quality_1", 2),
        ("quality_2", 3),
        ("quality_3", 3),
        ("metadata_1", 2),
        ("metadata_2", 2),
        ("metadata_3", 2),
        ("security_1", 4),
        ("security_2", 4),
        ("security_3", 3),
    ]
    .into_iter()
    .map(|(id, rating)| (id.to_string(), rating))
    .collect()
}
