//! C FFI API functions.

use crate::callback::{CallbackWrapper, UbinfitProgressCallback};
use crate::types::*;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_void};
use std::panic::{self, AssertUnwindSafe};

use u_binfit_core::{Allocator, Bin, Config, Error, ProgressInfo, Result, Shipment};
use u_binfit_packer::GreedyPacker;

/// Error codes.
pub const UBINFIT_OK: i32 = 0;
pub const UBINFIT_ERR_NULL_PTR: i32 = -1;
pub const UBINFIT_ERR_INVALID_JSON: i32 = -2;
pub const UBINFIT_ERR_PACK_FAILED: i32 = -3;
pub const UBINFIT_ERR_CANCELLED: i32 = -4;
pub const UBINFIT_ERR_UNKNOWN: i32 = -99;

/// Allocates shipments into bins from a JSON request.
///
/// # Safety
/// - `request_json` must be a valid null-terminated UTF-8 string
/// - `result_ptr` must be a valid pointer to a `*mut c_char`
/// - The caller must free the result string using `ubinfit_free_string`
#[no_mangle]
pub unsafe extern "C" fn ubinfit_pack(
    request_json: *const c_char,
    result_ptr: *mut *mut c_char,
) -> i32 {
    ubinfit_pack_with_progress(request_json, None, std::ptr::null_mut(), result_ptr)
}

/// Allocates shipments into bins with a progress callback.
///
/// # Parameters
/// - `request_json`: JSON request string
/// - `callback`: Optional progress callback function (can be NULL)
/// - `user_data`: Opaque pointer passed to callback (can be NULL)
/// - `result_ptr`: Output pointer for result JSON string
///
/// # Callback
/// The callback receives one snapshot JSON per unit commit.
/// Return non-zero to continue, zero to cancel. A cancelled run still
/// writes a response carrying the partial bin state.
///
/// # Safety
/// - `request_json` must be a valid null-terminated UTF-8 string
/// - `result_ptr` must be a valid pointer to a `*mut c_char`
/// - `callback` must be valid or NULL
/// - `user_data` must remain valid for the duration of the run
/// - The caller must free the result string using `ubinfit_free_string`
#[no_mangle]
pub unsafe extern "C" fn ubinfit_pack_with_progress(
    request_json: *const c_char,
    callback: UbinfitProgressCallback,
    user_data: *mut c_void,
    result_ptr: *mut *mut c_char,
) -> i32 {
    if request_json.is_null() || result_ptr.is_null() {
        return UBINFIT_ERR_NULL_PTR;
    }

    let json_str = match CStr::from_ptr(request_json).to_str() {
        Ok(s) => s,
        Err(_) => return UBINFIT_ERR_INVALID_JSON,
    };

    let request: PackRequest = match serde_json::from_str(json_str) {
        Ok(r) => r,
        Err(e) => {
            let response = PackResponse::failure(format!("Invalid JSON: {}", e));
            return write_response(&response, result_ptr, UBINFIT_ERR_INVALID_JSON);
        }
    };

    let callback_wrapper = CallbackWrapper::new(callback, user_data);
    let observer = callback.is_some().then_some(&callback_wrapper);
    let response = pack_guarded(request, observer);

    let code = if response.success {
        UBINFIT_OK
    } else if callback_wrapper.is_cancelled() {
        UBINFIT_ERR_CANCELLED
    } else {
        UBINFIT_ERR_PACK_FAILED
    };
    write_response(&response, result_ptr, code)
}

/// Frees a string allocated by U-BinFit.
///
/// # Safety
/// - `ptr` must have been allocated by a U-BinFit function
/// - `ptr` must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn ubinfit_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

/// Returns the API version from Cargo.toml.
///
/// # Safety
/// - The returned string is statically allocated and must not be freed
#[no_mangle]
pub extern "C" fn ubinfit_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

unsafe fn write_response(response: &PackResponse, result_ptr: *mut *mut c_char, code: i32) -> i32 {
    let response_json = match serde_json::to_string(response) {
        Ok(s) => s,
        Err(_) => return UBINFIT_ERR_UNKNOWN,
    };

    match CString::new(response_json) {
        Ok(cstr) => {
            *result_ptr = cstr.into_raw();
            code
        }
        Err(_) => UBINFIT_ERR_UNKNOWN,
    }
}

/// Parses a JSON request and runs it. Failures are reported in the response.
pub fn pack_json(json_str: &str) -> PackResponse {
    match serde_json::from_str::<PackRequest>(json_str) {
        Ok(request) => pack_request(request),
        Err(e) => PackResponse::failure(format!("Invalid JSON: {}", e)),
    }
}

/// Runs a parsed request. Failures are reported in the response.
pub fn pack_request(request: PackRequest) -> PackResponse {
    pack_guarded(request, None)
}

/// Converts every descriptor of a request, stopping at the first invalid one.
pub fn build_inputs(request: &PackRequest) -> Result<(Vec<Shipment>, Vec<Bin>)> {
    let shipments = request
        .shipments
        .iter()
        .enumerate()
        .map(|(i, s)| s.to_shipment(i))
        .collect::<Result<Vec<_>>>()?;
    let bins = request
        .bins
        .iter()
        .enumerate()
        .map(|(i, b)| b.to_bin(i))
        .collect::<Result<Vec<_>>>()?;
    Ok((shipments, bins))
}

/// Builds the run configuration of a request.
pub fn build_config(config: Option<&ConfigRequest>) -> Result<Config> {
    let config = config.map(ConfigRequest::to_config).unwrap_or_default();
    config.validate()?;
    Ok(config)
}

fn pack_guarded(request: PackRequest, callback: Option<&CallbackWrapper>) -> PackResponse {
    // A panic must not unwind across the C boundary.
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| pack_with_callback(request, callback)));

    match outcome {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => PackResponse::failure(e.to_string()),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            log::error!("Allocation panicked: {}", message);
            PackResponse::failure(Error::Internal(message).to_string())
        }
    }
}

fn pack_with_callback(
    request: PackRequest,
    callback: Option<&CallbackWrapper>,
) -> Result<PackResponse> {
    let (shipments, bins) = build_inputs(&request)?;
    let config = build_config(request.config.as_ref())?;
    let packer = GreedyPacker::new(config);

    let result = match callback {
        Some(wrapper) => {
            let mut on_progress =
                |info: &ProgressInfo<'_>| wrapper.invoke(&SnapshotJson::from(info));
            packer.allocate_with_progress(&shipments, &bins, &mut on_progress)?
        }
        None => packer.allocate(&shipments, &bins)?,
    };

    let cancelled_by_user =
        callback.is_some_and(CallbackWrapper::is_cancelled) && result.cancelled;

    let mut response = PackResponse::from(result);
    if cancelled_by_user {
        response.success = false;
        response.error = Some("Cancelled by user".to_string());
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST: &str = r#"{
        "shipments": [
            {"name": "Box", "length": 2, "height": 2, "width": 2, "weight": 5,
             "quantity": 3, "rotation_type": "any"}
        ],
        "bins": [
            {"name": "BinA", "length": 4, "height": 4, "width": 4, "max_weight": 20, "quantity": 1}
        ]
    }"#;

    unsafe fn take_response(result_ptr: *mut c_char) -> PackResponse {
        let result_str = CStr::from_ptr(result_ptr).to_str().unwrap();
        let response = serde_json::from_str(result_str).unwrap();
        ubinfit_free_string(result_ptr);
        response
    }

    #[test]
    fn test_version() {
        let version_ptr = ubinfit_version();
        unsafe {
            let version = CStr::from_ptr(version_ptr).to_str().unwrap();
            assert_eq!(version, env!("CARGO_PKG_VERSION"));
        }
    }

    #[test]
    fn test_pack_basic() {
        let request_cstr = CString::new(REQUEST).unwrap();
        let mut result_ptr: *mut c_char = std::ptr::null_mut();

        unsafe {
            let code = ubinfit_pack(request_cstr.as_ptr(), &mut result_ptr);
            assert_eq!(code, UBINFIT_OK);
            assert!(!result_ptr.is_null());

            let response = take_response(result_ptr);
            assert!(response.success);
            assert_eq!(response.placements, 3);
            assert_eq!(response.bins[0].items.len(), 3);
            assert!((response.bins[0].current_weight - 15.0).abs() < 1e-9);
            assert!(response.unfitted_items.is_empty());
        }
    }

    #[test]
    fn test_pack_reports_unfit() {
        let response = pack_json(
            r#"{
                "shipments": [
                    {"name": "Box", "length": 2, "height": 2, "width": 2, "weight": 10, "quantity": 2}
                ],
                "bins": [
                    {"name": "BinA", "length": 4, "height": 4, "width": 4, "max_weight": 15, "quantity": 1}
                ]
            }"#,
        );

        assert!(response.success);
        assert_eq!(response.bins[0].items.len(), 1);
        assert_eq!(
            response.unfitted_items,
            vec![UnfitResponse {
                name: "Box".into(),
                quantity: 1
            }]
        );
    }

    #[test]
    fn test_null_pointer() {
        let mut result_ptr: *mut c_char = std::ptr::null_mut();
        unsafe {
            let code = ubinfit_pack(std::ptr::null(), &mut result_ptr);
            assert_eq!(code, UBINFIT_ERR_NULL_PTR);
            assert!(result_ptr.is_null());

            let request_cstr = CString::new(REQUEST).unwrap();
            let code = ubinfit_pack(request_cstr.as_ptr(), std::ptr::null_mut());
            assert_eq!(code, UBINFIT_ERR_NULL_PTR);
        }
    }

    #[test]
    fn test_invalid_json() {
        let request_cstr = CString::new("{ not json").unwrap();
        let mut result_ptr: *mut c_char = std::ptr::null_mut();

        unsafe {
            let code = ubinfit_pack(request_cstr.as_ptr(), &mut result_ptr);
            assert_eq!(code, UBINFIT_ERR_INVALID_JSON);

            let response = take_response(result_ptr);
            assert!(!response.success);
            assert!(response.error.unwrap().contains("Invalid JSON"));
        }
    }

    #[test]
    fn test_missing_field_fails_request() {
        let request = r#"{
            "shipments": [{"name": "Box", "height": 2, "width": 2, "weight": 1, "quantity": 1}],
            "bins": []
        }"#;
        let request_cstr = CString::new(request).unwrap();
        let mut result_ptr: *mut c_char = std::ptr::null_mut();

        unsafe {
            let code = ubinfit_pack(request_cstr.as_ptr(), &mut result_ptr);
            assert_eq!(code, UBINFIT_ERR_PACK_FAILED);

            let response = take_response(result_ptr);
            assert!(!response.success);
            assert!(response.error.unwrap().contains("shipments[0].length"));
        }
    }

    #[test]
    fn test_invalid_config_fails_request() {
        let response = pack_json(
            r#"{"shipments": [], "bins": [], "config": {"max_placements": 0}}"#,
        );
        assert!(!response.success);
        assert!(response.error.is_some());
    }

    #[test]
    fn test_oversized_total_quantity_is_validation_failure() {
        let shipment = format!(
            r#"{{"name": "Box", "length": 1, "height": 1, "width": 1, "weight": 0, "quantity": {}}}"#,
            i64::MAX
        );
        let request = format!(
            r#"{{"shipments": [{0}, {0}, {0}], "bins": [
                {{"name": "BinA", "length": 4, "height": 4, "width": 4, "max_weight": 20, "quantity": 1}}
            ]}}"#,
            shipment
        );

        let response = pack_json(&request);
        assert!(!response.success);
        let error = response.error.unwrap();
        assert!(error.starts_with("Invalid shipment"), "{}", error);
    }

    #[test]
    fn test_unrecognized_rotation_never_placed() {
        let response = pack_json(
            r#"{
                "shipments": [
                    {"name": "Odd", "length": 1, "height": 1, "width": 1, "weight": 1,
                     "quantity": 2, "rotation_type": "diagonal"}
                ],
                "bins": [
                    {"name": "BinA", "length": 4, "height": 4, "width": 4, "max_weight": 20, "quantity": 1}
                ]
            }"#,
        );

        assert!(response.success);
        assert!(response.bins[0].items.is_empty());
        assert_eq!(response.unfitted_items[0].quantity, 2);
    }

    #[test]
    fn test_placement_cap_from_config() {
        let response = pack_json(
            r#"{
                "shipments": [
                    {"name": "Box", "length": 1, "height": 1, "width": 1, "weight": 1, "quantity": 5}
                ],
                "bins": [
                    {"name": "BinA", "length": 4, "height": 4, "width": 4, "max_weight": 20, "quantity": 1}
                ],
                "config": {"max_placements": 2}
            }"#,
        );

        assert!(response.success);
        assert!(response.cancelled);
        assert_eq!(response.placements, 2);
        assert_eq!(response.unfitted_items[0].quantity, 3);
    }

    #[test]
    fn test_pack_with_progress_no_callback() {
        let request_cstr = CString::new(REQUEST).unwrap();
        let mut result_ptr: *mut c_char = std::ptr::null_mut();

        unsafe {
            let code = ubinfit_pack_with_progress(
                request_cstr.as_ptr(),
                None,
                std::ptr::null_mut(),
                &mut result_ptr,
            );
            assert_eq!(code, UBINFIT_OK);
            assert!(take_response(result_ptr).success);
        }
    }

    #[test]
    fn test_pack_with_progress_callback() {
        unsafe extern "C" fn progress_callback(json: *const c_char, user_data: *mut c_void) -> i32 {
            let seen = &mut *(user_data as *mut Vec<SnapshotJson>);
            let json_str = CStr::from_ptr(json).to_str().unwrap();
            seen.push(serde_json::from_str(json_str).unwrap());
            1 // Continue
        }

        let request_cstr = CString::new(REQUEST).unwrap();
        let mut result_ptr: *mut c_char = std::ptr::null_mut();
        let mut seen: Vec<SnapshotJson> = Vec::new();

        unsafe {
            let code = ubinfit_pack_with_progress(
                request_cstr.as_ptr(),
                Some(progress_callback),
                &mut seen as *mut Vec<SnapshotJson> as *mut c_void,
                &mut result_ptr,
            );
            assert_eq!(code, UBINFIT_OK);
            assert!(take_response(result_ptr).success);
        }

        assert_eq!(seen.len(), 3);
        let sequences: Vec<usize> = seen.iter().map(|s| s.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
        assert_eq!(seen[0].bin_name, "BinA");
        assert_eq!(seen[0].remaining, 2);
        assert_eq!(seen[2].bins[0].items.len(), 3);
        assert_eq!(seen[2].total_units, 3);
    }

    #[test]
    fn test_pack_with_progress_cancel() {
        unsafe extern "C" fn cancel_callback(_json: *const c_char, _user_data: *mut c_void) -> i32 {
            0 // Cancel after the first commit
        }

        let request_cstr = CString::new(REQUEST).unwrap();
        let mut result_ptr: *mut c_char = std::ptr::null_mut();

        unsafe {
            let code = ubinfit_pack_with_progress(
                request_cstr.as_ptr(),
                Some(cancel_callback),
                std::ptr::null_mut(),
                &mut result_ptr,
            );
            assert_eq!(code, UBINFIT_ERR_CANCELLED);

            let response = take_response(result_ptr);
            assert!(!response.success);
            assert!(response.cancelled);
            assert!(response.error.as_ref().unwrap().contains("Cancelled"));
            assert_eq!(response.bins[0].items.len(), 1);
            assert_eq!(response.unfitted_items[0].quantity, 2);
        }
    }
}
