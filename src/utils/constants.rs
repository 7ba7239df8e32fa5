// All of those following can be overridden by .env

pub const DEFAULT_EXPECTED_CHAIN_ID: u64 = 11_155_111; // Sepolia
pub const DEFAULT_NETWORK: &str = "sepolia";
pub const DEFAULT_CHAIN_NAME: &str = "Sepolia Testnet";
pub const DEFAULT_NATIVE_CURRENCY_NAME: &str = "Ether";
pub const DEFAULT_NATIVE_CURRENCY_SYMBOL: &str = "ETH";
pub const DEFAULT_PUBLIC_RPC_URL: &str = "https://rpc.sepolia.org";
pub const DEFAULT_EXPLORER_URL: &str = "https://sepolia.etherscan.io";
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_NEYXT_TOKEN_ADDRESS: &str = "0x86b8B002ff72Be60C63E9Ae716348EDC1771F52e";

pub const TOKEN_SYMBOL: &str = "NEYXT";
pub const NATIVE_SYMBOL: &str = "ETH";
pub const TOKEN_DECIMALS: u32 = 18;
pub const NATIVE_DECIMALS: u32 = 18;

/// Genesis allowlist shipped with the tool, replaceable via GENESIS_ADDRESSES.
pub const DEFAULT_GENESIS_ADDRESSES: &[&str] = &[
    "0x1134Bb07cb7F35946E7e02f58cA7fcC64698B59b",
    "0x99Bb88cbC2A1D0B12f3BA63Cd51aC919B7601179",
    "0x82c5e1812079FE89bD8240c924592a1DC13BAd18",
    "0x90730d044Ccd332f5a23844F7E219d2CF0AC467C",
    "0x89691BaF004bf4A7D9Ce265d47903D3595996Ad7",
    "0x7Abb72de1cea2C7319338417537f23977dE9c111",
    "0x33D05F773131Acc38A605506953cE8c1b4580AC0",
    "0x739D97D7862062B6d14d9998c9513f7922d22A45",
    "0x68eEB5992bDBf53Ead548E80E59cFCb26bEca892",
    "0x9B273a89fe6EE30bD568856A169895C4E1e264d1",
    "0x8F13AF490425D40cA3179E4fa5D6847FcCCd85d6",
    "0x76E871415906652F268Ae45348564bB0194a65Ee",
    "0xe8c5E2dd21aaEc34575C2b5FF23708E2616AECd7",
    "0x4bf431e37539B8528f176B46CFd627699861df58",
];

pub const SECONDS_PER_DAY: u64 = 86_400;

/// EIP-1193 provider error codes consumed by the session.
pub const PROVIDER_CODE_USER_REJECTED: i64 = 4001;
pub const PROVIDER_CODE_UNRECOGNIZED_CHAIN: i64 = 4902;

pub const RECEIPT_POLL_INTERVAL_MS: u64 = 4_000;
pub const RECEIPT_POLL_ATTEMPTS: u32 = 45;

pub const DEEP_LINK_URL: &str =
    "https://metamask.app.link/dapp/https://wfounders.club/claim-nft";
