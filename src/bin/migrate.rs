use agrilink::{
    config::AppConfig,
    db::{create_orm_conn, prepare_schema},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;
    prepare_schema(&orm).await?;
    println!("Schema is up to date");
    Ok(())
}
