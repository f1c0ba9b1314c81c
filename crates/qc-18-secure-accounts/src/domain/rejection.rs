use thiserror::Error;

/// Expected reasons a transfer is refused. The `Display` text is the
/// `reason` string handed back to the host.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransferRejection {
    #[error("Invalid transaction type")]
    InvalidTransactionType,

    #[error("Invalid amount format")]
    InvalidAmountFormat,

    #[error("Amount is negative or zero")]
    NonPositiveAmount,

    #[error("Invalid account name")]
    InvalidAccountName,

    #[error("Invalid nonce")]
    InvalidNonce,

    #[error("Secure account not found")]
    UnknownSecureAccount,

    #[error("Missing signatures")]
    MissingSignatures,

    #[error("Invalid signatures")]
    InvalidSignatures,

    #[error("Secure account not found or invalid")]
    SecureAccountInvalid,

    #[error("Source or recipient account not found")]
    FundsAccountsNotFound,

    #[error("Insufficient balance in source account")]
    InsufficientBalance,

    #[error("Balance subtraction would overflow")]
    BalanceUnderflow,

    /// Same reason text as a negative nonce; the variant keeps the values.
    #[error("Invalid nonce")]
    NonceMismatch { expected: u64, actual: i64 },

    #[error("Transfer not allowed yet, time restriction")]
    TimeRestricted,

    #[error("Transfer amount exceeds allowed limit")]
    AmountExceedsLimit,
}
