use courier_kit::utils::GenericResult;
use serde::de::DeserializeOwned;
use std::io::Read;

/// Reads a configuration object of given type from json.
pub fn read_json_config<T: DeserializeOwned, R: Read>(reader: R) -> GenericResult<T> {
    serde_json::from_reader(reader).map_err(|err| format!("cannot read config: {err}").into())
}
