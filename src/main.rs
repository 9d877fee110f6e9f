use anyhow::Result;

#[actix_web::main]
async fn main() -> Result<()> {
    vigovia_itinerary_server::run().await?;
    Ok(())
}
