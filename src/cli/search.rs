use tabled::Table;

use crate::{cli::shared, error, info, utils};

pub async fn search(term: String, types: String, limit: Option<u32>) {
    let settings = shared::load_settings();
    let client = shared::build_client(&settings).await;

    let pb = shared::spinner(&format!("Searching for \"{}\"...", term));
    let result = client.search(&term, &types, limit).await;
    pb.finish_and_clear();

    let response = match result {
        Ok(response) => response,
        Err(e) => error!("Search failed. Err: {}", e),
    };

    let rows = utils::resource_rows(&response);
    if rows.is_empty() {
        info!("No results for \"{}\" in storefront {}", term, client.storefront());
        return;
    }

    println!("{}", Table::new(rows));
}
