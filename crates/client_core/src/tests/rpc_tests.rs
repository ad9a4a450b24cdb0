use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::protocol::{
    AccountMeta, DropInstruction, SignatureEntry, TransactionRequest, DROP_COMMISSION_BPS,
    DROP_PRICE_LAMPORTS, DROP_PROGRAM_ID, SYSTEM_PROGRAM_ID,
};
use tokio::net::TcpListener;

use super::*;

fn signed(request: TransactionRequest) -> SignedTransaction {
    let signatures = request
        .accounts
        .iter()
        .filter(|account| account.is_signer)
        .map(|account| SignatureEntry {
            signer: account.address,
            signature_b64: STANDARD.encode([0u8; 64]),
        })
        .collect();
    SignedTransaction {
        request,
        signatures,
    }
}

fn create_drop(listing: Address, seller: Address, price: u64) -> SignedTransaction {
    signed(TransactionRequest {
        program_id: DROP_PROGRAM_ID,
        instruction: DropInstruction::CreateDrop {
            price,
            commission_bps: DROP_COMMISSION_BPS,
            metadata_uri: "ipfs://outfit".into(),
        },
        accounts: vec![
            AccountMeta::signer(listing, true),
            AccountMeta::signer(seller, true),
            AccountMeta::readonly(SYSTEM_PROGRAM_ID),
        ],
        fee_payer: seller,
    })
}

fn buy_drop(listing: Address, buyer: Address, price: u64) -> SignedTransaction {
    signed(TransactionRequest {
        program_id: DROP_PROGRAM_ID,
        instruction: DropInstruction::BuyDrop { price },
        accounts: vec![
            AccountMeta::writable(listing),
            AccountMeta::signer(buyer, true),
        ],
        fee_payer: buyer,
    })
}

#[tokio::test]
async fn in_memory_chain_registers_and_sells_listings() {
    let chain = InMemoryChain::new();
    let listing = Address::new([1u8; 32]);
    let seller = Address::new([2u8; 32]);
    let buyer = Address::new([3u8; 32]);

    chain
        .submit(create_drop(listing, seller, DROP_PRICE_LAMPORTS))
        .await
        .unwrap();
    let record = chain.fetch_listing(listing).await.unwrap().unwrap();
    assert_eq!(record.seller, seller);
    assert_eq!(record.price, DROP_PRICE_LAMPORTS);
    assert!(!record.sold);

    chain
        .submit(buy_drop(listing, buyer, DROP_PRICE_LAMPORTS))
        .await
        .unwrap();
    assert!(chain.fetch_listing(listing).await.unwrap().unwrap().sold);

    // A second purchase of the same listing fails program-side.
    let err = chain
        .submit(buy_drop(listing, buyer, DROP_PRICE_LAMPORTS))
        .await
        .unwrap_err();
    assert!(matches!(err, TransactionError::Execution(_)));
}

#[tokio::test]
async fn in_memory_chain_enforces_price_equality() {
    let chain = InMemoryChain::new();
    let listing = Address::new([4u8; 32]);
    chain
        .submit(create_drop(listing, Address::new([5u8; 32]), DROP_PRICE_LAMPORTS))
        .await
        .unwrap();

    let err = chain
        .submit(buy_drop(listing, Address::new([6u8; 32]), 1))
        .await
        .unwrap_err();
    assert!(matches!(err, TransactionError::Execution(_)));
    assert!(!chain.fetch_listing(listing).await.unwrap().unwrap().sold);
}

#[tokio::test]
async fn in_memory_chain_rejects_unsigned_transactions() {
    let chain = InMemoryChain::new();
    let mut transaction =
        create_drop(Address::new([7u8; 32]), Address::new([8u8; 32]), DROP_PRICE_LAMPORTS);
    transaction.signatures.clear();
    assert!(matches!(
        chain.submit(transaction).await,
        Err(TransactionError::Execution(_))
    ));
}

#[tokio::test]
async fn missing_chain_rpc_fails_with_network_error() {
    let rpc = MissingChainRpc;
    assert!(matches!(
        rpc.fetch_listing(Address::new([0u8; 32])).await,
        Err(TransactionError::Network(_))
    ));
}

async fn spawn_gateway(listing: Address, record: DropListing) -> String {
    async fn get_listing(
        State((known, record)): State<(Address, DropListing)>,
        Path(address): Path<String>,
    ) -> Result<Json<DropListing>, StatusCode> {
        if address == known.to_string() {
            Ok(Json(record))
        } else {
            Err(StatusCode::NOT_FOUND)
        }
    }

    async fn submit(
        Json(transaction): Json<SignedTransaction>,
    ) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
        match transaction.request.instruction {
            DropInstruction::BuyDrop { price } if price == 0 => Err((
                StatusCode::BAD_REQUEST,
                "payment amount does not match the drop price".into(),
            )),
            _ => Ok(Json(serde_json::json!({ "signature": "gateway-1" }))),
        }
    }

    let app = Router::new()
        .route("/listings/:address", get(get_listing))
        .route("/transactions", post(submit))
        .with_state((listing, record));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn http_chain_rpc_round_trips_against_a_gateway() {
    let listing = Address::new([9u8; 32]);
    let record = DropListing {
        seller: Address::new([10u8; 32]),
        price: DROP_PRICE_LAMPORTS,
        commission_bps: DROP_COMMISSION_BPS,
        metadata_uri: "ipfs://outfit".into(),
        sold: false,
    };
    let endpoint = spawn_gateway(listing, record.clone()).await;
    let rpc = HttpChainRpc::new(endpoint);

    assert_eq!(rpc.fetch_listing(listing).await.unwrap(), Some(record));
    assert_eq!(
        rpc.fetch_listing(Address::new([11u8; 32])).await.unwrap(),
        None
    );

    let confirmation = rpc
        .submit(buy_drop(listing, Address::new([12u8; 32]), DROP_PRICE_LAMPORTS))
        .await
        .unwrap();
    assert_eq!(confirmation.0, "gateway-1");

    // The gateway rejects zero-price purchases with a 4xx, which the client
    // must surface as an execution failure rather than a transport one.
    let err = rpc
        .submit(buy_drop(listing, Address::new([12u8; 32]), 0))
        .await
        .unwrap_err();
    assert!(matches!(err, TransactionError::Execution(_)));
}

#[tokio::test]
async fn http_chain_rpc_maps_unreachable_endpoint_to_network_error() {
    let rpc = HttpChainRpc::new("http://127.0.0.1:1");
    assert!(matches!(
        rpc.fetch_listing(Address::new([0u8; 32])).await,
        Err(TransactionError::Network(_))
    ));
}
