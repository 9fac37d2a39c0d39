//! Protocol constants
//!
//! These constants define the header bit layout, message type codes,
//! parameter codes, and dongle command opcodes used by the XRF protocol.

/// Version of the XRF specification implemented here.
pub const XRF_VERSION: u8 = 2;
/// Maximum total radio packet length (limited by the CC430 radio).
pub const XRF_MAX_LEN: usize = 61;
/// Maximum number of mesh hops a packet may take.
pub const XRF_MAX_HOPS: u8 = 5;
/// Length of a fixture UID in bytes.
pub const UID_LEN: usize = 8;

// ============================================================================
// Header Bit Layout
// ============================================================================

/// Unicast flag (bit 7 of the header byte).
pub const XRF_UNICAST: u8 = 0x80;
/// Message type mask (bits 6-4 of the header byte).
pub const XRF_TYPE_MASK: u8 = 0x70;
/// Shift for the message type field.
pub const XRF_TYPE_SHIFT: u8 = 4;
/// Parameter id mask (bits 3-0 of the header byte).
pub const XRF_PARAM_MASK: u8 = 0x0F;

// ============================================================================
// Message Type Codes
// ============================================================================

/// Request for identification and capabilities.
pub const XRF_TYPE_ID: u8 = 0;
/// Ack with UID and capabilities.
pub const XRF_TYPE_IDACK: u8 = 1;
/// Request to get a parameter.
pub const XRF_TYPE_GET: u8 = 2;
/// Ack with a parameter value.
pub const XRF_TYPE_GETACK: u8 = 3;
/// Set a parameter.
pub const XRF_TYPE_SET: u8 = 4;
/// Ack confirming a parameter set.
pub const XRF_TYPE_SETACK: u8 = 5;
/// Parameter reported asynchronously.
pub const XRF_TYPE_REPORT: u8 = 6;
/// Parameter reported asynchronously, with the origin UID appended.
pub const XRF_TYPE_REPORTACK: u8 = 7;
/// Ack bit of the type field.
pub const XRF_TYPE_ACKBIT: u8 = 1;

// ============================================================================
// Parameter Codes
// ============================================================================

/// Motion - simple.
pub const XRF_PARAM_MOTIONSIMPLE: u8 = 0;
/// Motion - fancy.
pub const XRF_PARAM_MOTIONFANCY: u8 = 1;
/// Ambient light measurement.
pub const XRF_PARAM_LIGHT: u8 = 2;
/// Temperatures.
pub const XRF_PARAM_TEMP: u8 = 3;
/// Power status.
pub const XRF_PARAM_PWRSTAT: u8 = 4;
/// Instantaneous PWM levels (v2; legacy PWM in v1).
pub const XRF_PARAM_IPWM: u8 = 5;
/// Instantaneous PWM levels (deprecated).
pub const XRF_PARAM_IPWMD: u8 = 6;
/// Switch contact closures.
pub const XRF_PARAM_SWITCH: u8 = 7;
/// Motion timeout.
pub const XRF_PARAM_MOTIONTIME: u8 = 8;
/// Self test.
pub const XRF_PARAM_SELFTEST: u8 = 9;
/// Group/channel membership.
pub const XRF_PARAM_GROUP: u8 = 10;
/// Total service times.
pub const XRF_PARAM_SVC_TIMES: u8 = 11;
/// Fader.
pub const XRF_PARAM_FADER: u8 = 12;
/// Local enables.
pub const XRF_PARAM_LOCALEN: u8 = 13;
/// Report enables.
pub const XRF_PARAM_REPORTEN: u8 = 14;
/// Extended parameter (real sub-id carried in the value bytes).
pub const XRF_PARAM_EXTENDED: u8 = 15;

// ============================================================================
// Extended Parameter Codes (first value byte when param = extended)
// ============================================================================

/// Enable blackbody dimming.
pub const XRF_X_BBDIM_EN: u8 = 0;
/// Color temperatures (degrees K).
pub const XRF_X_CT: u8 = 1;
/// Light level triggers.
pub const XRF_X_LIGHTLEVELS: u8 = 2;
/// Temperature trip points.
pub const XRF_X_TEMPLEVELS: u8 = 3;
/// Beeper.
pub const XRF_X_BEEP: u8 = 4;
/// Relay control.
pub const XRF_X_RELAY: u8 = 5;
/// Unoccupied dim level.
pub const XRF_X_UNOCC_DIM: u8 = 6;
/// Min/max PWM levels for dim.
pub const XRF_X_MINMAX_PWM: u8 = 7;
/// On-battery dim levels (occupied, unoccupied).
pub const XRF_X_NBATT_DIM: u8 = 8;
/// Min/max dim level for fader.
pub const XRF_X_MINMAX_FADER: u8 = 9;
/// Real time clock current time (set/get).
pub const XRF_X_RTC_TIME: u8 = 10;
/// RTC on (enable) time.
pub const XRF_X_RTC_ON: u8 = 11;
/// RTC off (disable) time.
pub const XRF_X_RTC_OFF: u8 = 12;
/// Product description string (read-only).
pub const XRF_X_PROD_STR: u8 = 13;
/// Hop count for packet origination.
pub const XRF_X_HOPCNT: u8 = 14;
/// Fade times (up/down).
pub const XRF_X_FADETIMES: u8 = 15;
/// Report time (seconds).
pub const XRF_X_REPORTTIME: u8 = 16;
/// Hardware switch settings.
pub const XRF_X_HWSWITCHES: u8 = 17;
/// DALI payload.
pub const XRF_X_DALI: u8 = 18;
/// Set up a dim packet to output with PWM changes.
pub const XRF_X_DALI_DIMPACKET: u8 = 19;
/// I2C payload.
pub const XRF_X_I2C: u8 = 20;
/// Firmware version (image 0/1/current).
pub const XRF_X_FW_VER: u8 = 21;
/// Firmware image N size.
pub const XRF_X_FW_SIZE: u8 = 22;
/// Firmware image CRC/valid.
pub const XRF_X_FW_CRC: u8 = 23;
/// Firmware sector size (must fit into one packet).
pub const XRF_X_FW_SECT_SIZE: u8 = 24;
/// Firmware image N sector M data.
pub const XRF_X_FW_SECT_DATA: u8 = 25;
/// Firmware boot command - update with image N and reboot.
pub const XRF_X_FW_BOOT: u8 = 26;
/// Remotely set logging level for the fixture.
pub const XRF_X_LOGLEVEL: u8 = 27;
/// What to do when power fails (battery fixtures).
pub const XRF_X_PWRFAIL_SW: u8 = 28;
/// Model number (product id).
pub const XRF_X_PRODUCT_ID: u8 = 29;
/// XRF stack tuning.
pub const XRF_X_STACKTUNE: u8 = 30;
/// Long-term PWM averages.
pub const XRF_X_PWMAVG: u8 = 31;

// ============================================================================
// Local Enable Bits
// ============================================================================

/// Motion dimming enabled locally.
pub const XRF_LOCAL_MOTIONDIM: u16 = 1 << 0;
/// Ambient light sensing enabled locally.
pub const XRF_LOCAL_LIGHT: u16 = 1 << 1;
/// Fader enabled locally.
pub const XRF_LOCAL_FADER: u16 = 1 << 2;
/// Temperature sensing enabled locally.
pub const XRF_LOCAL_TEMP: u16 = 1 << 3;
/// Occupancy switch mode bit 0.
pub const XRF_LOCAL_OCCSWMODE0: u16 = 1 << 4;
/// Occupancy switch mode bit 1.
pub const XRF_LOCAL_OCCSWMODE1: u16 = 1 << 5;
/// Calendar enabled locally.
pub const XRF_LOCAL_CALENDAR: u16 = 1 << 6;
/// Time-slave mode.
pub const XRF_LOCAL_TIMESLAVE: u16 = 1 << 7;
/// DALI PWM output.
pub const XRF_LOCAL_DALIPWM: u16 = 1 << 8;

// ============================================================================
// Report Enable Bits
// ============================================================================

/// Report simple motion.
pub const XRF_RPT_MOTIONSIMPLE: u16 = 1 << 0;
/// Report fancy motion.
pub const XRF_RPT_MOTION: u16 = 1 << 1;
/// Report ambient light.
pub const XRF_RPT_LIGHT: u16 = 1 << 2;
/// Report temperature.
pub const XRF_RPT_TEMP: u16 = 1 << 3;
/// Report power status.
pub const XRF_RPT_PWRSTAT: u16 = 1 << 4;
/// Act as time master.
pub const XRF_RPT_TIMEMASTER: u16 = 1 << 5;
/// Report instantaneous PWM.
pub const XRF_RPT_IPWM: u16 = 1 << 6;
/// Report fader.
pub const XRF_RPT_FADER: u16 = 1 << 7;
/// Report motion timeout.
pub const XRF_RPT_MOTIONTIME: u16 = 1 << 8;
/// Report self test.
pub const XRF_RPT_SELFTEST: u16 = 1 << 9;
/// Report switch closures.
pub const XRF_RPT_SWITCH: u16 = 1 << 12;
/// Append UID to reports.
pub const XRF_RPT_UID: u16 = 1 << 14;

// ============================================================================
// Self Test Bits
// ============================================================================

/// Start a self test.
pub const XRF_TEST_START: u8 = 1 << 7;
/// Test the radio.
pub const XRF_TEST_RF: u8 = 1 << 2;
/// Test the battery.
pub const XRF_TEST_BATTERY: u8 = 1 << 1;
/// Test the relay.
pub const XRF_TEST_RELAY: u8 = 1;

// ============================================================================
// Relay Bits
// ============================================================================

/// Relay on/off.
pub const XRF_RELAY_ONOFF: u8 = 1;
/// If set, dim[1]=0 turns off the relay.
pub const XRF_RELAY_MODE_DIMOFF: u8 = 2;

// ============================================================================
// Switch Bits
// ============================================================================

/// Vacancy switch mode.
pub const XRF_SWITCH_VACANCY: u8 = 1;

// ============================================================================
// Groups
// ============================================================================

/// Universal group: received by all fixtures on the channel.
pub const XRF_UNIVERSAL_GROUP: u8 = 0xFF;

// ============================================================================
// Transport Frame Tags (host ↔ dongle serial link)
// ============================================================================

/// Radio packet received over RF, forwarded to the host.
pub const TAG_RX_PACKET: u8 = b'R';
/// Radio packet to be transmitted over RF (and its echo).
pub const TAG_TX_PACKET: u8 = b'T';
/// Dongle command (and its echo).
pub const TAG_COMMAND: u8 = b'C';
/// Log text from the dongle.
pub const TAG_LOG: u8 = b'L';

// ============================================================================
// Dongle Command Opcodes
// ============================================================================

/// Send back the dongle info string (as a log frame).
pub const UCMD_INFO: u8 = 0;
/// Send back the dongle UID string (as a log frame).
pub const UCMD_UID: u8 = 1;
/// Change the RF channel (stairwell number).
pub const UCMD_CHANNEL: u8 = 2;
/// Enable meshing by the dongle (otherwise it is a passive listener/TX).
pub const UCMD_ENMESH: u8 = 3;
/// Enable forwarding received RF packets to the host.
pub const UCMD_ENRX: u8 = 4;
/// Enable the dongle transmitting its own reports via RF.
pub const UCMD_ENRPT: u8 = 5;
/// Set the dongle log level.
pub const UCMD_LOGLEVEL: u8 = 6;
/// Set the radio to test mode (CW for power calibration).
pub const UCMD_TESTMODE: u8 = 7;
