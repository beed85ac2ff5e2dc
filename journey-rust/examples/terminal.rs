use capsule_journey::{
    GenerationClient, GenerationConfig, Journey, JourneyEvent, ResultsReport, SubmitOutcome,
    Theme, View,
};
use dotenvy::dotenv;
use std::{
    error::Error,
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tokio::io::{self, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

const FRAME: Duration = Duration::from_millis(20);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = GenerationClient::from_config(GenerationConfig::from_env());
    let mut journey = Journey::default();
    journey.subscribe(Arc::new(|event: &JourneyEvent| match event {
        JourneyEvent::Checkpoint { message } => println!("\n  ✦ {message}\n"),
        JourneyEvent::ReviewFailed { message } => println!("\n  ! {message}\n"),
        _ => {}
    }));

    let mut lines = BufReader::new(io::stdin()).lines();

    println!("2025 Memory Capsule. Press enter to begin.");
    lines.next_line().await?;
    journey.start()?;

    let catalog = Theme::catalog();
    for (i, theme) in catalog.iter().enumerate() {
        println!("  {}. {} {}", i + 1, theme.name, theme.description);
    }
    let theme = loop {
        let choice = prompt(&mut lines, "Pick a colour for your year: ").await?;
        if let Some(theme) = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| catalog.get(n.wrapping_sub(1)))
        {
            break theme.clone();
        }
    };
    journey.choose_theme(theme)?;

    println!("Holding the capsule...");
    journey.press_unlock()?;
    while journey.view() == View::UnlockGesture {
        tokio::time::sleep(FRAME).await;
        journey.tick(FRAME);
    }

    while journey.view() != View::Results {
        let question = journey.current_question().clone();
        println!(
            "\n[{:.0}%] {}\n{}\n{}",
            journey.progress_percent(),
            question.category,
            question.prompt_primary,
            question.prompt_secondary
        );
        let input = prompt(
            &mut lines,
            &format!(
                "({}; ? for inspiration, < to go back) > ",
                question.placeholder_or_default()
            ),
        )
        .await?;

        match input.trim() {
            "?" => {
                if let Some(hint) = journey.inspire(&client).await {
                    println!("{hint}");
                }
            }
            "<" => {
                journey.back();
            }
            answer => {
                if let SubmitOutcome::Finished(ticket) = journey.submit_answer(answer)? {
                    println!("\nSealing your year...");
                    journey.synthesize(&client, ticket).await;
                }
            }
        }
        journey.tick(FRAME);
    }

    if let Some(report) = journey.report() {
        println!("\n《{}》\n", report.letter_title);
        for paragraph in &report.paragraphs {
            println!("{paragraph}\n");
        }
        for keyword in &report.keywords {
            println!("  {} · {}", keyword.word, keyword.explanation);
        }
        let millis = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis();
        println!("\n(export as {})", ResultsReport::file_name(millis));
    }

    if let Some(greeting) = journey.transcript().turns().first() {
        println!("\n{}", greeting.text);
    }
    loop {
        let message = prompt(&mut lines, "you > ").await?;
        if message.trim().is_empty() {
            break;
        }
        if let Some(reply) = journey.chat(&client, &message).await {
            println!("2025 > {reply}");
        }
    }

    journey.reset();
    Ok(())
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> io::Result<String> {
    use std::io::Write;
    print!("{label}");
    std::io::stdout().flush()?;
    lines
        .next_line()
        .await?
        .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"))
}
