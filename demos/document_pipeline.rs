//! Run a small document pipeline: fan a trigger event out to two
//! enrichment stages, then join the branches back into one aggregate.

use serde_json::json;
use tokio_stream::StreamExt;

use docweave::types::{DocumentRef, Event, Metadata, StageSpec};
use docweave::{CompletionPolicy, Reducer, ReducerConfig, RoutingGraph};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
  tracing_subscriber::fmt().init();

  let graph = RoutingGraph::builder()
    .stage(
      StageSpec::new("trigger")
        .accepts(["*/*"])
        .produces(["text/plain"]),
    )
    .stage(
      StageSpec::new("sentiment")
        .accepts(["text/plain"])
        .produces(["text/plain"]),
    )
    .stage(
      StageSpec::new("translate")
        .accepts(["text/plain"])
        .produces(["text/plain"]),
    )
    .stage(
      StageSpec::new("join")
        .accepts(["text/plain"])
        .produces(["application/json"]),
    )
    .connect("trigger", "sentiment")
    .connect("trigger", "translate")
    .connect("sentiment", "join")
    .connect("translate", "join")
    .build();

  let plan = docweave::validate(&graph)?;
  println!("Validated routing plan with {} edges.", plan.edges().len());

  let trigger = Event::new(DocumentRef::new("s3://bucket/report.txt", "text/plain")?);
  println!("Trigger {} routes to: {:?}", trigger.id(), plan.route("trigger", &trigger));

  let mut config = ReducerConfig::new("join");
  config.policy = CompletionPolicy::count(2);
  let (reducer, mut aggregates) = Reducer::new(config);

  for (stage, patch) in [
    ("sentiment", json!({ "sentiment": "positive" })),
    ("translate", json!({ "language": "fr" })),
  ] {
    let mut branch = trigger.derived(stage);
    branch
      .payload_mut()
      .merge_metadata(&Metadata::from_value(patch).ok_or("patch must be an object")?);
    let arrival = reducer.on_arrival(branch).await?;
    println!("  {stage}: {arrival:?}");
  }

  if let Some(joined) = aggregates.next().await {
    println!("Joined aggregate:");
    println!("  Chain: {}", joined.chain_id());
    println!("  History: {:?}", joined.payload().call_history());
    println!("  Wire form: {}", joined.to_wire());
  }
  Ok(())
}
