//! Interactive chat command.
//!
//! A readline loop over the query pipeline. Each question stands alone;
//! answers come strictly from the indexed recordings.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::lifecycle::ModelContext;
use crate::rag::{QueryOutcome, QueryPipeline};
use console::style;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

/// Run the interactive chat command.
pub async fn run_chat(settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check_api_access(&settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'hark doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let ctx = Arc::new(ModelContext::new(settings));
    let spinner = Output::spinner("Initializing pipeline...");
    let init = ctx.initialize().await;
    spinner.finish_and_clear();
    init?;

    let pipeline = QueryPipeline::new(ctx.clone());
    let mut show_sources = true;

    println!("\n{}", style("Hark Chat").bold().cyan());
    println!(
        "{}\n",
        style("Ask about your voice memos. 'sources' toggles attribution, 'exit' quits.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            // ctrl-d
            println!();
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }

        if input.eq_ignore_ascii_case("sources") {
            show_sources = !show_sources;
            Output::info(if show_sources {
                "Source attribution on."
            } else {
                "Source attribution off."
            });
            continue;
        }

        let spinner = Output::spinner("Thinking...");
        let result = pipeline.answer(input).await;
        spinner.finish_and_clear();

        match result.outcome {
            QueryOutcome::Answered => {
                println!("\n{} {}\n", style("Hark:").cyan().bold(), result.answer);
                if show_sources && !result.sources.is_empty() {
                    println!("{}", style("Sources:").dim());
                    for source in &result.sources {
                        Output::list_item(source);
                    }
                    println!();
                }
            }
            QueryOutcome::NoInformation => {
                println!("\n{} {}\n", style("Hark:").cyan().bold(), style(&result.answer).dim());
            }
            QueryOutcome::NotReady | QueryOutcome::Failed => {
                Output::warning(&result.answer);
            }
        }
    }

    Output::info("Goodbye!");
    ctx.shutdown().await;
    Ok(())
}
