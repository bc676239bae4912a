use tabled::Table;

use crate::{Payload, error, info, success, types::ResourceResponse, utils, warning};

/// Prints a payload as a resource table, or as pretty JSON when `raw_json` is set
/// or the body holds no resources.
pub(crate) fn print_payload(payload: Payload, raw_json: bool) {
    let value = match payload {
        Payload::Json(value) => value,
        Payload::Raw(response) => {
            success!("Request succeeded with status {}", response.status());
            return;
        }
    };

    if !raw_json {
        if let Ok(resources) = serde_json::from_value::<ResourceResponse>(value.clone()) {
            if let Some(errors) = &resources.errors {
                for e in errors {
                    warning!(
                        "{}: {}",
                        e.title.as_deref().unwrap_or("error"),
                        e.detail.as_deref().unwrap_or_default()
                    );
                }
            }

            let rows = utils::resource_rows(&resources);
            if !rows.is_empty() {
                let count = rows.len();
                println!("{}", Table::new(rows));
                if let Some(next) = &resources.next {
                    info!("{} resources shown, more at {}", count, next);
                }
                return;
            }
        }
    }

    match serde_json::to_string_pretty(&value) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Cannot format response. Err: {}", e),
    }
}
