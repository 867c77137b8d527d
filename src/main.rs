use completion_params::walkthrough::{
    self, SweepRun, DEFAULT_SEED, MAX_TOKENS_VALUES, N_VALUES, PENALTY_VALUES,
    TEMPERATURE_VALUES, TOP_P_VALUES,
};
use completion_params::{logger, ClientConfig, CompletionError, CompletionRequest, CompletionRequester, UsageTally};

const SYSTEM_PROMPT: &str = "You are a helpful assistant that answers in plain prose.";
const USER_PROMPT: &str = "Describe a lighthouse on a stormy night.";
const REPETITION_PROMPT: &str = "List some words that describe the ocean.";

#[tokio::main]
async fn main() {

    dotenvy::dotenv().ok();
    logger::init();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("configuration error: {}", e);
            std::process::exit(2);
        }
    };
    tracing::info!(endpoint = %config.endpoint, model = %config.model, azure = config.is_azure(), "using completion endpoint");

    let requester = CompletionRequester::new(config);
    let tally = UsageTally::new();

    if let Err(e) = run(&requester, &tally).await {
        tracing::error!("walkthrough stopped: {}", e);
        std::process::exit(1);
    }

    let totals = tally.snapshot();
    println!(
        "\n{} calls, {} completions, {} tokens ({} prompt / {} completion), {:.1} tokens per call",
        totals.calls,
        totals.completions,
        totals.total_tokens,
        totals.prompt_tokens,
        totals.completion_tokens,
        totals.tokens_per_call()
    );

}

async fn run(requester: &CompletionRequester, tally: &UsageTally) -> Result<(), CompletionError> {

    let base = CompletionRequest::new(SYSTEM_PROMPT, USER_PROMPT);
    // penalties only show up over longer outputs with repeated words
    let repetitive = CompletionRequest::new(SYSTEM_PROMPT, REPETITION_PROMPT).with_max_tokens(120);

    let defaults = vec![SweepRun {
        label: "no parameters".to_string(),
        completions: requester.complete(&base).await?
    }];
    record(tally, &defaults);
    print_section("service defaults", &defaults);

    let runs = walkthrough::max_tokens_sweep(requester, &base, &MAX_TOKENS_VALUES).await?;
    record(tally, &runs);
    print_section("max_tokens", &runs);

    let limited = base.clone().with_max_tokens(60);

    let runs = walkthrough::temperature_sweep(requester, &limited, &TEMPERATURE_VALUES).await?;
    record(tally, &runs);
    print_section("temperature", &runs);

    let runs = walkthrough::top_p_sweep(requester, &limited, &TOP_P_VALUES).await?;
    record(tally, &runs);
    print_section("top_p", &runs);

    let runs = walkthrough::n_sweep(requester, &limited, &N_VALUES).await?;
    record(tally, &runs);
    print_section("n", &runs);

    let runs = walkthrough::presence_penalty_sweep(requester, &repetitive, &PENALTY_VALUES).await?;
    record(tally, &runs);
    print_section("presence_penalty", &runs);

    let runs = walkthrough::frequency_penalty_sweep(requester, &repetitive, &PENALTY_VALUES).await?;
    record(tally, &runs);
    print_section("frequency_penalty", &runs);

    let report = walkthrough::seed_reproducibility(requester, &limited, DEFAULT_SEED, 3).await?;
    record(tally, &report.runs);
    print_section(&format!("seed={} temperature=0", report.seed), &report.runs);
    println!(
        "identical across runs: {} (fingerprints: {:?})",
        report.identical(),
        report.system_fingerprints
    );

    Ok(())

}

fn record(tally: &UsageTally, runs: &[SweepRun]) {

    for run in runs {
        tally.record(&run.completions);
    }

}

fn print_section(title: &str, runs: &[SweepRun]) {

    println!("\n=== {} ===", title);
    for run in runs {
        for (i, text) in run.completions.iter().enumerate() {
            let label = if run.completions.len() > 1 {
                format!("{} #{}", run.label, i + 1)
            } else {
                run.label.clone()
            };
            println!("[{}] {}", label, text.trim());
        }
    }

}
