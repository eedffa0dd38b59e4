/// Installs the process-wide tracing subscriber. The host should call this once, early,
/// before creating any engine. Later calls are ignored.
#[unsafe(no_mangle)]
pub extern "C" fn vrp_logger_init() {
    vr_host_integrations::logger::init();
}
