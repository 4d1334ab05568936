use organization_client::models::Organization;
use organization_client::{Client, Environment, RetryPolicy, StaticToken};
use std::time::Duration;

// Usage: ORGANIZATION_API_TOKEN=<token> cargo run --example create_organization
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let token = std::env::var("ORGANIZATION_API_TOKEN")?;
    let environment = Environment::Qa;
    let client = Client::for_environment(StaticToken::new(token), environment)?
        .retry_policy(RetryPolicy::new(Duration::from_secs(10)));

    let organization = Organization {
        name: Some("Sample Org".into()),
        address_line1: Some("1 way".into()),
        city: Some("Park City".into()),
        state: Some("UT".into()),
        postal_code: Some("84098".into()),
        country: Some("USA".into()),
        free_trial_hours: Some(0),
        running_simulation_limit: Some(1),
        active: Some(true),
        saas_agreement_accepted: Some(false),
        ..Default::default()
    };
    let created = client.create_organization(&organization).await?;
    println!("Created: {:?}", created);

    for subscription in client.subscriptions(Some(5)).await? {
        if let Some(plan_id) = subscription.plan_id {
            let plan = client.plan(plan_id).await?;
            println!("Subscription {:?} is on plan {:?}", subscription.id, plan.name);
        }
    }
    Ok(())
}
