#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tempwatch::run().await
}
